use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::{CheckError, Result};
use crate::types::{DrawResult, MatchRule, PrizeTier, RunningTier, TierWarning, TierWarningKind};

/// A provider payload normalized into a [`DrawResult`], plus the tiers that
/// were skipped on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDraw {
    pub draw: DrawResult,
    pub warnings: Vec<TierWarning>,
}

/// Fields every tier entry must carry, shared by both tier kinds.
struct TierFields {
    id: String,
    name: String,
    reward: f64,
    numbers: BTreeSet<String>,
}

pub fn parse_draw_result(payload: &Value) -> Result<ParsedDraw> {
    if payload.get("status").and_then(Value::as_str) != Some("success") {
        return Err(CheckError::schema("status is not \"success\""));
    }
    let response = payload
        .get("response")
        .and_then(Value::as_object)
        .ok_or_else(|| CheckError::schema("missing response object"))?;

    let date = required_str(response, "date", "response")?;
    let endpoint = required_str(response, "endpoint", "response")?;
    let prizes = required_array(response, "prizes")?;
    let running = required_array(response, "runningNumbers")?;

    let mut warnings = Vec::new();

    let mut prize_tiers = Vec::with_capacity(prizes.len());
    for entry in prizes {
        if let Some(fields) = tier_fields(entry, "prizes", &mut warnings)? {
            prize_tiers.push(PrizeTier {
                id: fields.id,
                name: fields.name,
                reward: fields.reward,
                numbers: fields.numbers,
            });
        }
    }

    let mut running_tiers = Vec::with_capacity(running.len());
    for entry in running {
        let Some(fields) = tier_fields(entry, "runningNumbers", &mut warnings)? else {
            continue;
        };
        match match_rule_for(&fields.id) {
            Some(match_rule) => running_tiers.push(RunningTier {
                id: fields.id,
                name: fields.name,
                reward: fields.reward,
                numbers: fields.numbers,
                match_rule,
            }),
            None => skip(&mut warnings, fields.id, TierWarningKind::UnrecognizedRule),
        }
    }

    Ok(ParsedDraw {
        draw: DrawResult {
            date,
            endpoint,
            prize_tiers,
            running_tiers,
        },
        warnings,
    })
}

/// The only place a running tier's id text is inspected.
pub fn match_rule_for(tier_id: &str) -> Option<MatchRule> {
    if tier_id.contains("FrontThree") {
        Some(MatchRule::Prefix3)
    } else if tier_id.contains("BackThree") {
        Some(MatchRule::Suffix3)
    } else if tier_id.contains("BackTwo") {
        Some(MatchRule::Suffix2)
    } else {
        None
    }
}

/// Missing fields are hard failures; a malformed number list or a zero reward
/// only drops this tier.
fn tier_fields(
    entry: &Value,
    section: &str,
    warnings: &mut Vec<TierWarning>,
) -> Result<Option<TierFields>> {
    let entry = entry
        .as_object()
        .ok_or_else(|| CheckError::schema(format!("{section} entry is not an object")))?;

    let id = required_str(entry, "id", section)?;
    let name = required_str(entry, "name", section)?;
    let reward = entry
        .get("reward")
        .ok_or_else(|| CheckError::schema(format!("{section} tier '{id}' has no reward")))
        .and_then(|value| coerce_reward(value, &id))?;
    let number = entry
        .get("number")
        .ok_or_else(|| CheckError::schema(format!("{section} tier '{id}' has no number list")))?;

    let Some(numbers) = number_list(number) else {
        skip(warnings, id, TierWarningKind::NumbersNotSequence);
        return Ok(None);
    };
    if reward == 0.0 {
        skip(warnings, id, TierWarningKind::ZeroReward);
        return Ok(None);
    }

    Ok(Some(TierFields {
        id,
        name,
        reward,
        numbers,
    }))
}

fn coerce_reward(value: &Value, tier_id: &str) -> Result<f64> {
    let reward = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match reward {
        Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
        _ => Err(CheckError::schema(format!(
            "tier '{tier_id}' has invalid reward {value}"
        ))),
    }
}

fn number_list(value: &Value) -> Option<BTreeSet<String>> {
    value
        .as_array()?
        .iter()
        .map(|n| n.as_str().map(str::to_string))
        .collect()
}

fn required_str(object: &Map<String, Value>, key: &str, section: &str) -> Result<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CheckError::schema(format!("{section}.{key} is missing or not a string")))
}

fn required_array<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>> {
    object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| CheckError::schema(format!("response.{key} is missing or not a sequence")))
}

fn skip(warnings: &mut Vec<TierWarning>, tier_id: String, kind: TierWarningKind) {
    warn!("Dropping tier '{}': {}", tier_id, kind);
    warnings.push(TierWarning { tier_id, kind });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(prizes: Value, running: Value) -> Value {
        json!({
            "status": "success",
            "response": {
                "date": "16 กรกฎาคม 2568",
                "endpoint": "https://lotto.api.rayriffy.com/lotto/16072568",
                "prizes": prizes,
                "runningNumbers": running,
            }
        })
    }

    #[test]
    fn parses_a_full_draw() {
        let raw = payload(
            json!([
                { "id": "prizeFirst", "name": "First", "reward": "6000000", "amount": 1, "number": ["123456"] },
                { "id": "prizeFirstNear", "name": "Near First", "reward": 100000, "number": ["123455", "123457"] },
            ]),
            json!([
                { "id": "runningNumberFrontThree", "name": "Front 3", "reward": "4000", "number": ["999", "001"] },
                { "id": "runningNumberBackThree", "name": "Back 3", "reward": "4000", "number": ["456", "777"] },
                { "id": "runningNumberBackTwo", "name": "Back 2", "reward": "2000", "number": ["56"] },
            ]),
        );

        let parsed = parse_draw_result(&raw).unwrap();
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.draw.date, "16 กรกฎาคม 2568");
        assert_eq!(
            parsed.draw.endpoint,
            "https://lotto.api.rayriffy.com/lotto/16072568"
        );
        assert_eq!(parsed.draw.prize_tiers.len(), 2);
        assert_eq!(parsed.draw.prize_tiers[0].reward, 6_000_000.0);
        assert_eq!(parsed.draw.prize_tiers[1].numbers.len(), 2);

        let rules: Vec<MatchRule> = parsed
            .draw
            .running_tiers
            .iter()
            .map(|t| t.match_rule)
            .collect();
        assert_eq!(
            rules,
            vec![MatchRule::Prefix3, MatchRule::Suffix3, MatchRule::Suffix2]
        );
    }

    #[test]
    fn rejects_non_success_status() {
        let mut raw = payload(json!([]), json!([]));
        raw["status"] = json!("error");
        assert!(matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))));
    }

    #[test]
    fn rejects_missing_response() {
        let raw = json!({ "status": "success" });
        assert!(matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))));
    }

    #[test]
    fn rejects_non_sequence_tier_lists() {
        let raw = payload(json!({ "id": "prizeFirst" }), json!([]));
        assert!(matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))));

        let mut raw = payload(json!([]), json!([]));
        raw["response"]
            .as_object_mut()
            .unwrap()
            .remove("runningNumbers");
        assert!(matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))));
    }

    #[test]
    fn rejects_tier_missing_required_field() {
        for missing in ["id", "name", "reward", "number"] {
            let mut tier = json!({ "id": "prizeFirst", "name": "First", "reward": "10", "number": ["123456"] });
            tier.as_object_mut().unwrap().remove(missing);
            let raw = payload(json!([tier]), json!([]));
            assert!(
                matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))),
                "missing {missing} should fail"
            );
        }
    }

    #[test]
    fn rejects_negative_or_non_numeric_reward() {
        for reward in [json!("-5"), json!("abc"), json!("NaN"), json!("inf"), json!(-1), json!(null)] {
            let raw = payload(
                json!([{ "id": "prizeFirst", "name": "First", "reward": reward, "number": ["123456"] }]),
                json!([]),
            );
            assert!(
                matches!(parse_draw_result(&raw), Err(CheckError::Schema(_))),
                "reward {reward} should fail"
            );
        }
    }

    #[test]
    fn drops_unrecognized_running_tier_with_warning() {
        let raw = payload(
            json!([]),
            json!([
                { "id": "Unknown", "name": "Mystery", "reward": "1000", "number": ["12"] },
                { "id": "runningNumberBackTwo", "name": "Back 2", "reward": "2000", "number": ["56"] },
            ]),
        );

        let parsed = parse_draw_result(&raw).unwrap();
        assert_eq!(parsed.draw.running_tiers.len(), 1);
        assert_eq!(parsed.draw.running_tiers[0].id, "runningNumberBackTwo");
        assert_eq!(
            parsed.warnings,
            vec![TierWarning {
                tier_id: "Unknown".to_string(),
                kind: TierWarningKind::UnrecognizedRule,
            }]
        );
    }

    #[test]
    fn drops_tier_whose_numbers_are_not_a_sequence() {
        let raw = payload(
            json!([
                { "id": "prizeFirst", "name": "First", "reward": "6000000", "number": "123456" },
                { "id": "prizeSecond", "name": "Second", "reward": "200000", "number": [123456] },
                { "id": "prizeThird", "name": "Third", "reward": "80000", "number": ["654321"] },
            ]),
            json!([]),
        );

        let parsed = parse_draw_result(&raw).unwrap();
        assert_eq!(parsed.draw.prize_tiers.len(), 1);
        assert_eq!(parsed.draw.prize_tiers[0].id, "prizeThird");
        assert_eq!(parsed.warnings.len(), 2);
        assert!(parsed
            .warnings
            .iter()
            .all(|w| w.kind == TierWarningKind::NumbersNotSequence));
    }

    #[test]
    fn drops_zero_reward_tier() {
        let raw = payload(
            json!([{ "id": "prizeFirst", "name": "First", "reward": "0", "number": ["123456"] }]),
            json!([]),
        );
        let parsed = parse_draw_result(&raw).unwrap();
        assert!(parsed.draw.prize_tiers.is_empty());
        assert_eq!(parsed.warnings[0].kind, TierWarningKind::ZeroReward);
    }

    #[test]
    fn rule_inference_prefers_front_three() {
        assert_eq!(match_rule_for("runningNumberFrontThree"), Some(MatchRule::Prefix3));
        assert_eq!(match_rule_for("BackThree"), Some(MatchRule::Suffix3));
        assert_eq!(match_rule_for("xBackTwox"), Some(MatchRule::Suffix2));
        assert_eq!(match_rule_for("backtwo"), None);
    }
}
