use crate::model::tree::ItemKind;
use crate::session::engine::EngineEvent;

/// A malformed script line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    /// 1-based
    pub line: usize,
    pub message: String,
}

/// Parse a drag-event script.
///
/// One event per line, `#` starts a comment:
///
/// ```text
/// start activity a1
/// over a1 a2 below
/// end a1 a2
/// cancel
/// confirm
/// undo
/// ```
///
/// `over` takes an optional target and an optional `above`/`below` (default
/// `above`); `end` takes an optional target.
pub fn parse_script(source: &str) -> Result<Vec<EngineEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let event = parse_event(&words).map_err(|message| ScriptError {
            line: idx + 1,
            message,
        })?;
        events.push(event);
    }
    Ok(events)
}

fn parse_event(words: &[&str]) -> Result<EngineEvent, String> {
    let (verb, args) = (words[0], &words[1..]);
    match verb {
        "start" => match args {
            [kind, active] => {
                let kind = ItemKind::parse(kind).ok_or_else(|| {
                    format!(
                        "unknown kind '{}' (expected activity, subprocess or process)",
                        kind
                    )
                })?;
                Ok(EngineEvent::Start {
                    active_id: active.to_string(),
                    kind,
                })
            }
            _ => Err("usage: start <kind> <active-id>".into()),
        },
        "over" => {
            let (active, over, below) = match args {
                [active] => (active, None, false),
                [active, over] => (active, Some(over), false),
                [active, over, side] => (active, Some(over), parse_side(side)?),
                _ => return Err("usage: over <active-id> [<over-id> [above|below]]".into()),
            };
            Ok(EngineEvent::Over {
                active_id: active.to_string(),
                over_id: over.map(|s| s.to_string()),
                pointer_below_target_bottom: below,
            })
        }
        "end" => match args {
            [active] => Ok(EngineEvent::End {
                active_id: active.to_string(),
                over_id: None,
            }),
            [active, over] => Ok(EngineEvent::End {
                active_id: active.to_string(),
                over_id: Some(over.to_string()),
            }),
            _ => Err("usage: end <active-id> [<over-id>]".into()),
        },
        "cancel" | "confirm" | "undo" if !args.is_empty() => {
            Err(format!("'{}' takes no arguments", verb))
        }
        "cancel" => Ok(EngineEvent::Cancel),
        "confirm" => Ok(EngineEvent::Confirm),
        "undo" => Ok(EngineEvent::Undo),
        other => Err(format!("unknown event '{}'", other)),
    }
}

fn parse_side(word: &str) -> Result<bool, String> {
    match word {
        "below" => Ok(true),
        "above" => Ok(false),
        other => Err(format!("expected above or below, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_session() {
        let events = parse_script(
            "\
# move a1 into p2
start activity a1
over a1 a2          # hovering the first row
over a1 a2 below
end a1 a1

confirm
",
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                EngineEvent::Start {
                    active_id: "a1".into(),
                    kind: ItemKind::Activity,
                },
                EngineEvent::Over {
                    active_id: "a1".into(),
                    over_id: Some("a2".into()),
                    pointer_below_target_bottom: false,
                },
                EngineEvent::Over {
                    active_id: "a1".into(),
                    over_id: Some("a2".into()),
                    pointer_below_target_bottom: true,
                },
                EngineEvent::End {
                    active_id: "a1".into(),
                    over_id: Some("a1".into()),
                },
                EngineEvent::Confirm,
            ]
        );
    }

    #[test]
    fn test_optional_targets() {
        let events = parse_script("over s1\nend s1\ncancel\nundo\n").unwrap();
        assert_eq!(
            events,
            vec![
                EngineEvent::Over {
                    active_id: "s1".into(),
                    over_id: None,
                    pointer_below_target_bottom: false,
                },
                EngineEvent::End {
                    active_id: "s1".into(),
                    over_id: None,
                },
                EngineEvent::Cancel,
                EngineEvent::Undo,
            ]
        );
    }

    #[test]
    fn test_error_reports_line_number() {
        let err = parse_script("start process p2\n\nstart widget w1\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("unknown kind 'widget'"));
        assert!(err.to_string().starts_with("line 3: "));
    }

    #[test]
    fn test_bad_side_and_arity() {
        assert_eq!(
            parse_script("over a1 a2 sideways").unwrap_err().message,
            "expected above or below, got 'sideways'"
        );
        assert!(parse_script("end").is_err());
        assert!(parse_script("confirm now").is_err());
        assert!(parse_script("drop a1").is_err());
    }

    #[test]
    fn test_empty_script() {
        assert!(parse_script("\n  # nothing\n").unwrap().is_empty());
    }
}
