/// Channel modes — flags plus pure functions for mode-string parsing and
/// rendering.

/// Per-channel mode flags. `key` and `limit` collapse the `k`/`l` flag and
/// its value: `Some` means set.
#[derive(Debug, Clone, Default)]
pub struct ChannelModes {
    /// +i — invite only
    pub invite_only: bool,
    /// +t — only operators can set the topic
    pub topic_locked: bool,
    /// +k — channel key (password)
    pub key: Option<String>,
    /// +l — user limit
    pub limit: Option<usize>,
}

impl ChannelModes {
    /// Current flag letters, e.g. `+itk`. Always begins with `+`.
    pub fn flag_string(&self) -> String {
        let mut flags = String::from("+");
        if self.invite_only {
            flags.push('i');
        }
        if self.topic_locked {
            flags.push('t');
        }
        if self.key.is_some() {
            flags.push('k');
        }
        if self.limit.is_some() {
            flags.push('l');
        }
        flags
    }

    /// Arguments accompanying [`flag_string`](Self::flag_string), in flag
    /// order: the key, then the limit.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ref key) = self.key {
            args.push(key.clone());
        }
        if let Some(limit) = self.limit {
            args.push(limit.to_string());
        }
        args
    }
}

/// A single mode change: `+i`, `-t`, `+k secret`, `+o nick`, …
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    /// true = setting (+), false = unsetting (-)
    pub setting: bool,
    /// The mode character.
    pub mode: char,
    /// Optional parameter (key, limit, or nick for `o`).
    pub param: Option<String>,
}

/// Parse an IRC mode string with its parameters into individual changes.
///
/// A leading sign sets the direction (initially `+`). Parameter
/// consumption per letter: `o` always takes one; `k` and `l` take one when
/// setting; `i` and `t` never do. Unknown letters are still emitted so the
/// caller can answer 472 and continue.
pub fn parse_mode_string(mode_str: &str, params: &[String]) -> Vec<ModeChange> {
    let mut changes = Vec::new();
    let mut setting = true;
    let mut param_idx = 0;

    let take = |param_idx: &mut usize| {
        let param = params.get(*param_idx).cloned();
        if param.is_some() {
            *param_idx += 1;
        }
        param
    };

    for ch in mode_str.chars() {
        match ch {
            '+' => setting = true,
            '-' => setting = false,
            'i' | 't' => changes.push(ModeChange {
                setting,
                mode: ch,
                param: None,
            }),
            'k' | 'l' => {
                let param = if setting { take(&mut param_idx) } else { None };
                changes.push(ModeChange {
                    setting,
                    mode: ch,
                    param,
                });
            }
            'o' => {
                let param = take(&mut param_idx);
                changes.push(ModeChange {
                    setting,
                    mode: 'o',
                    param,
                });
            }
            _ => changes.push(ModeChange {
                setting,
                mode: ch,
                param: None,
            }),
        }
    }

    changes
}

/// Render accepted changes as a composite mode string plus its arguments,
/// e.g. `+i-t+k` with `["secret"]`, for the post-MODE broadcast.
pub fn render_changes(changes: &[ModeChange]) -> (String, Vec<String>) {
    let mut flags = String::new();
    let mut args = Vec::new();
    let mut current_sign: Option<bool> = None;

    for change in changes {
        if current_sign != Some(change.setting) {
            flags.push(if change.setting { '+' } else { '-' });
            current_sign = Some(change.setting);
        }
        flags.push(change.mode);
        if let Some(ref param) = change.param {
            args.push(param.clone());
        }
    }

    (flags, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ChannelModes ────────────────────────────────────────────────

    #[test]
    fn default_modes_are_clear() {
        let modes = ChannelModes::default();
        assert!(!modes.invite_only);
        assert!(!modes.topic_locked);
        assert!(modes.key.is_none());
        assert!(modes.limit.is_none());
        assert_eq!(modes.flag_string(), "+");
        assert!(modes.args().is_empty());
    }

    #[test]
    fn flag_string_orders_letters() {
        let modes = ChannelModes {
            invite_only: true,
            topic_locked: true,
            key: Some("secret".into()),
            limit: Some(25),
        };
        assert_eq!(modes.flag_string(), "+itkl");
        assert_eq!(modes.args(), vec!["secret", "25"]);
    }

    #[test]
    fn args_with_limit_only() {
        let modes = ChannelModes {
            limit: Some(10),
            ..ChannelModes::default()
        };
        assert_eq!(modes.flag_string(), "+l");
        assert_eq!(modes.args(), vec!["10"]);
    }

    // ── parse_mode_string ───────────────────────────────────────────

    #[test]
    fn parse_simple_flags() {
        let changes = parse_mode_string("+it", &[]);
        assert_eq!(
            changes,
            vec![
                ModeChange { setting: true, mode: 'i', param: None },
                ModeChange { setting: true, mode: 't', param: None },
            ]
        );
    }

    #[test]
    fn parse_defaults_to_setting() {
        let changes = parse_mode_string("i", &[]);
        assert_eq!(changes, vec![ModeChange { setting: true, mode: 'i', param: None }]);
    }

    #[test]
    fn parse_mixed_signs() {
        let changes = parse_mode_string("+i-t+i", &[]);
        assert!(changes[0].setting);
        assert!(!changes[1].setting);
        assert!(changes[2].setting);
    }

    #[test]
    fn parse_key_consumes_param_on_set() {
        let changes = parse_mode_string("+k", &["secret".into()]);
        assert_eq!(
            changes,
            vec![ModeChange { setting: true, mode: 'k', param: Some("secret".into()) }]
        );
    }

    #[test]
    fn parse_unset_key_takes_no_param() {
        let changes = parse_mode_string("-k", &["leftover".into()]);
        assert_eq!(changes, vec![ModeChange { setting: false, mode: 'k', param: None }]);
    }

    #[test]
    fn parse_limit_set_and_unset() {
        let changes = parse_mode_string("+l-l", &["50".into()]);
        assert_eq!(
            changes,
            vec![
                ModeChange { setting: true, mode: 'l', param: Some("50".into()) },
                ModeChange { setting: false, mode: 'l', param: None },
            ]
        );
    }

    #[test]
    fn parse_operator_grants() {
        let changes = parse_mode_string("+o-o", &["alice".into(), "bob".into()]);
        assert_eq!(
            changes,
            vec![
                ModeChange { setting: true, mode: 'o', param: Some("alice".into()) },
                ModeChange { setting: false, mode: 'o', param: Some("bob".into()) },
            ]
        );
    }

    #[test]
    fn parse_missing_param_yields_none() {
        let changes = parse_mode_string("+k", &[]);
        assert_eq!(changes, vec![ModeChange { setting: true, mode: 'k', param: None }]);
    }

    #[test]
    fn parse_unknown_mode_is_surfaced() {
        let changes = parse_mode_string("+x", &[]);
        assert_eq!(changes, vec![ModeChange { setting: true, mode: 'x', param: None }]);
    }

    #[test]
    fn parse_complex_mode_string() {
        let changes = parse_mode_string("+it-k+l", &["25".into()]);
        assert_eq!(changes.len(), 4);
        assert_eq!(changes[3], ModeChange { setting: true, mode: 'l', param: Some("25".into()) });
    }

    // ── render_changes ──────────────────────────────────────────────

    #[test]
    fn render_merges_consecutive_signs() {
        let changes = vec![
            ModeChange { setting: true, mode: 'i', param: None },
            ModeChange { setting: true, mode: 'k', param: Some("secret".into()) },
            ModeChange { setting: false, mode: 't', param: None },
        ];
        let (flags, args) = render_changes(&changes);
        assert_eq!(flags, "+ik-t");
        assert_eq!(args, vec!["secret"]);
    }

    #[test]
    fn render_empty() {
        let (flags, args) = render_changes(&[]);
        assert!(flags.is_empty());
        assert!(args.is_empty());
    }

    #[test]
    fn parse_then_render_roundtrip() {
        let params = vec!["secret".into(), "alice".into()];
        let changes = parse_mode_string("+ik-t+o", &params);
        let (flags, args) = render_changes(&changes);
        assert_eq!(flags, "+ik-t+o");
        assert_eq!(args, vec!["secret", "alice"]);
    }
}
