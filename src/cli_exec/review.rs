use anyhow::{Context, Result, bail};

use mrq::model::CliOverrides;
use mrq::remote::GitlabClient;

use crate::cli_commands::mr::ReviewAssignedArgs;

use super::resolved_clients;

/// What one profile's review pass produced.
struct ReviewOutcome {
    assigned: usize,
    merged: Vec<u64>,
    skipped: usize,
    item_failures: usize,
}

/// Merge every mergeable open merge request assigned to the token's user,
/// across all resolved profiles. Failures are isolated per profile and per
/// item; every remaining profile is still attempted, and the command exits
/// non-zero at the end if anything failed.
pub(super) fn handle_review_assigned(
    overrides: &CliOverrides,
    args: ReviewAssignedArgs,
) -> Result<()> {
    let clients = resolved_clients(overrides)?;
    let mut summaries = Vec::new();
    let mut failed = 0usize;

    for client in &clients {
        let label = client.profile().label().to_string();
        let outcome = review_profile(client, &label);
        failed += record_outcome(&label, outcome, args.json, &mut summaries);
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("serialize review summary")?
        );
    }
    if failed > 0 {
        bail!("{} operation(s) failed", failed);
    }
    Ok(())
}

fn review_profile(client: &GitlabClient, label: &str) -> Result<ReviewOutcome> {
    let user = client.current_user().context("fetch current user")?;
    let assigned = client
        .list_assigned_merge_requests(&user)
        .context("list assigned merge requests")?;

    let mut merged = Vec::new();
    let mut skipped = 0usize;
    let mut item_failures = 0usize;
    for mr in &assigned {
        if !mr.is_merge_candidate() {
            skipped += 1;
            continue;
        }
        // is_merge_candidate guarantees the iid.
        let Some(iid) = mr.iid else { continue };
        match client.merge(iid) {
            Ok(_) => merged.push(iid),
            Err(err) => {
                item_failures += 1;
                eprintln!("warning: merge !{} ({}) failed: {:#}", iid, label, err);
            }
        }
    }
    Ok(ReviewOutcome {
        assigned: assigned.len(),
        merged,
        skipped,
        item_failures,
    })
}

/// Fold one profile's outcome into the run summary. Returns how many
/// failures the profile contributed to the final exit status.
fn record_outcome(
    label: &str,
    outcome: Result<ReviewOutcome>,
    json: bool,
    summaries: &mut Vec<serde_json::Value>,
) -> usize {
    match outcome {
        Ok(out) => {
            if !json {
                println!(
                    "[{}] assigned: {}, merged: {}, skipped: {}",
                    label,
                    out.assigned,
                    out.merged.len(),
                    out.skipped
                );
            }
            summaries.push(serde_json::json!({
                "profile": label,
                "assigned": out.assigned,
                "merged": out.merged,
                "skipped": out.skipped,
            }));
            out.item_failures
        }
        Err(err) => {
            eprintln!("warning: profile '{}': {:#}", label, err);
            summaries.push(serde_json::json!({
                "profile": label,
                "error": format!("{:#}", err),
            }));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_profile_is_recorded_and_later_profiles_still_fold() {
        let mut summaries = Vec::new();

        let failed = record_outcome(
            "alpha",
            Err(anyhow::anyhow!("connection refused")),
            true,
            &mut summaries,
        );
        assert_eq!(failed, 1);

        let outcome = ReviewOutcome {
            assigned: 2,
            merged: vec![4],
            skipped: 1,
            item_failures: 0,
        };
        let failed = record_outcome("beta", Ok(outcome), true, &mut summaries);
        assert_eq!(failed, 0);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0]["profile"], "alpha");
        assert!(
            summaries[0]["error"]
                .as_str()
                .is_some_and(|e| e.contains("connection refused"))
        );
        assert_eq!(summaries[1]["profile"], "beta");
        assert_eq!(summaries[1]["merged"][0], 4);
    }

    #[test]
    fn item_failures_count_against_the_exit_status() {
        let outcome = ReviewOutcome {
            assigned: 3,
            merged: Vec::new(),
            skipped: 1,
            item_failures: 2,
        };
        let mut summaries = Vec::new();
        assert_eq!(record_outcome("main", Ok(outcome), false, &mut summaries), 2);
        assert_eq!(summaries[0]["assigned"], 3);
    }
}
