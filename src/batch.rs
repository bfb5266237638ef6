use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::engine::check_prize;
use crate::types::{DrawResult, PriceCheckResult};

/// Checks every ticket against one draw concurrently. The output has one
/// result per input, in input order; a bad ticket only affects its own slot.
///
/// Dropping the returned future aborts the outstanding evaluations.
pub async fn check_prizes_batch(
    ticket_numbers: &[String],
    draw: Arc<DrawResult>,
) -> Vec<PriceCheckResult> {
    let slots = map_in_order(ticket_numbers.to_vec(), |number| {
        let draw = Arc::clone(&draw);
        async move { check_prize(&number, &draw) }
    })
    .await;

    let results: Vec<PriceCheckResult> = slots
        .into_iter()
        .zip(ticket_numbers)
        .map(|(slot, number)| {
            slot.unwrap_or_else(|| {
                PriceCheckResult::failed(number, &draw, "evaluation did not complete")
            })
        })
        .collect();

    let summary = BatchSummary::from_results(&results);
    debug!(
        "Checked {} tickets against {}: {} winners, {} failed",
        summary.checked, draw.endpoint, summary.winners, summary.failed
    );

    results
}

/// Spawns one task per item and writes each output back at its item's index,
/// whatever order the tasks finish in. A slot stays `None` if its task panicked.
async fn map_in_order<T, R, F, Fut>(items: Vec<T>, f: F) -> Vec<Option<R>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(items.len()).collect();

    let mut tasks = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let pending = f(item);
        tasks.spawn(async move { (index, pending.await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, output)) => slots[index] = Some(output),
            Err(e) => warn!("Ticket evaluation task failed: {}", e),
        }
    }

    slots
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub checked: usize,
    pub winners: usize,
    pub failed: usize,
    pub total_winning: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[PriceCheckResult]) -> Self {
        results.iter().fold(
            BatchSummary {
                checked: results.len(),
                ..Default::default()
            },
            |mut summary, result| {
                if result.error.is_some() {
                    summary.failed += 1;
                } else if result.is_winner() {
                    summary.winners += 1;
                    summary.total_winning += result.total_winning;
                }
                summary
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchRule, PrizeTier, RunningTier};
    use std::sync::Mutex;
    use std::time::Duration;

    fn draw() -> Arc<DrawResult> {
        Arc::new(DrawResult {
            date: "16 กรกฎาคม 2568".to_string(),
            endpoint: "16072568".to_string(),
            prize_tiers: vec![PrizeTier {
                id: "prizeFirst".to_string(),
                name: "First".to_string(),
                reward: 6_000_000.0,
                numbers: ["123456".to_string()].into(),
            }],
            running_tiers: vec![RunningTier {
                id: "runningNumberBackTwo".to_string(),
                name: "Back 2".to_string(),
                reward: 2000.0,
                numbers: ["56".to_string()].into(),
                match_rule: MatchRule::Suffix2,
            }],
        })
    }

    fn tickets(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn one_result_per_ticket_in_input_order() {
        let input = tickets(&["123456", "000000", "999956"]);
        let results = check_prizes_batch(&input, draw()).await;

        assert_eq!(results.len(), 3);
        let numbers: Vec<&str> = results.iter().map(|r| r.ticket_number.as_str()).collect();
        assert_eq!(numbers, vec!["123456", "000000", "999956"]);
        assert_eq!(results[0].total_winning, 6_002_000.0);
        assert_eq!(results[1].total_winning, 0.0);
        assert_eq!(results[2].total_winning, 2000.0);
    }

    // Volume check on a multi-thread runtime; the forced out-of-order case is
    // `slots_follow_input_when_later_items_finish_first`.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn order_survives_parallel_scheduling() {
        let input: Vec<String> = (0..2000).map(|n| format!("{:06}", n * 37 % 1_000_000)).collect();
        let results = check_prizes_batch(&input, draw()).await;

        assert_eq!(results.len(), input.len());
        for (ticket, result) in input.iter().zip(&results) {
            assert_eq!(&result.ticket_number, ticket);
            assert!(result.error.is_none());
        }
    }

    #[tokio::test]
    async fn bad_ticket_does_not_abort_siblings() {
        let input = tickets(&["123456", "12345", "abcdef", "000056"]);
        let results = check_prizes_batch(&input, draw()).await;

        assert_eq!(results.len(), 4);
        assert!(results[0].error.is_none());
        assert!(results[1].error.is_some());
        assert!(results[2].error.is_some());
        assert!(results[3].error.is_none());
        for failed in &results[1..3] {
            assert!(failed.matched_tiers.is_empty());
            assert_eq!(failed.total_winning, 0.0);
        }
        assert_eq!(results[3].total_winning, 2000.0);
    }

    #[tokio::test]
    async fn empty_batch() {
        assert!(check_prizes_batch(&[], draw()).await.is_empty());
    }

    #[tokio::test]
    async fn summary_counts_winners_and_failures() {
        let input = tickets(&["123456", "000000", "111156", "bad"]);
        let results = check_prizes_batch(&input, draw()).await;
        let summary = BatchSummary::from_results(&results);

        assert_eq!(
            summary,
            BatchSummary {
                checked: 4,
                winners: 2,
                failed: 1,
                total_winning: 6_004_000.0,
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn slots_follow_input_when_later_items_finish_first() {
        let finished = Arc::new(Mutex::new(Vec::new()));
        let delays_ms = vec![120u64, 80, 40, 0];

        let slots = map_in_order(delays_ms.clone(), |delay| {
            let finished = Arc::clone(&finished);
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                finished.lock().unwrap().push(delay);
                delay
            }
        })
        .await;

        assert_eq!(*finished.lock().unwrap(), vec![0, 40, 80, 120]);
        assert_eq!(slots, vec![Some(120), Some(80), Some(40), Some(0)]);
    }

    #[tokio::test]
    async fn panicked_task_leaves_only_its_slot_empty() {
        let slots = map_in_order(vec![1u32, 2, 3], |n| async move {
            if n == 2 {
                panic!("evaluation blew up");
            }
            n * 10
        })
        .await;

        assert_eq!(slots, vec![Some(10), None, Some(30)]);
    }
}
