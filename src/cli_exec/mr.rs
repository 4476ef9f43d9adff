use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};

use mrq::model::CliOverrides;
use mrq::remote::{MergeRequest, Note, post_comment_verified};

use crate::cli_commands::mr::{CommentArgs, ListArgs, MergeArgs};

use super::{parse_iid, resolved_clients};

const STATES: &[&str] = &["opened", "closed", "locked", "merged", "all"];

pub(super) fn handle_list(overrides: &CliOverrides, args: ListArgs) -> Result<()> {
    let state = args.state.trim().to_lowercase();
    if !STATES.contains(&state.as_str()) {
        bail!(
            "invalid --state '{}' (expected one of: {})",
            args.state,
            STATES.join(", ")
        );
    }

    let clients = resolved_clients(overrides)?;
    let many = clients.len() > 1;

    if args.json {
        // BTreeMap would reorder; profiles stay in resolution order.
        let mut aggregate = Vec::new();
        for client in &clients {
            let items = client.list_merge_requests(Some(&state))?;
            aggregate.push(serde_json::json!({
                "profile": client.profile().label(),
                "mergeRequests": items,
            }));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&aggregate).context("serialize merge request list")?
        );
        return Ok(());
    }

    for client in &clients {
        let items = client.list_merge_requests(Some(&state))?;
        if many {
            println!("[{}]", client.profile().label());
        }
        if items.is_empty() {
            println!("no merge requests");
        }
        for mr in &items {
            print_merge_request(mr);
        }
    }
    Ok(())
}

fn print_merge_request(mr: &MergeRequest) {
    let iid = mr
        .iid
        .map(|i| format!("!{}", i))
        .unwrap_or_else(|| "!?".to_string());
    let author = mr
        .author
        .as_ref()
        .and_then(|a| a.username.as_deref())
        .unwrap_or("?");
    println!("{}  {}  [{}]  by {}", iid, mr.title, mr.state, author);
    if let Some(url) = mr.web_url.as_deref() {
        println!("    {}", url);
    }
}

pub(super) fn handle_comment(overrides: &CliOverrides, args: CommentArgs) -> Result<()> {
    let iid = parse_iid(&args.iid)?;
    let body = args.body.trim();
    if body.is_empty() {
        bail!("comment body is empty");
    }

    let clients = resolved_clients(overrides)?;
    let mut posted: BTreeMap<String, Note> = BTreeMap::new();
    for client in &clients {
        let note = post_comment_verified(client, iid, body)
            .with_context(|| format!("comment on !{} ({})", iid, client.profile().label()))?;
        if !args.json {
            println!("commented on !{} ({})", iid, client.profile().label());
        }
        posted.insert(client.profile().label().to_string(), note);
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&posted).context("serialize comment result")?
        );
    }
    Ok(())
}

pub(super) fn handle_merge(overrides: &CliOverrides, args: MergeArgs) -> Result<()> {
    let iid = parse_iid(&args.iid)?;

    let clients = resolved_clients(overrides)?;
    let mut merged: BTreeMap<String, MergeRequest> = BTreeMap::new();
    for client in &clients {
        let mr = client
            .merge(iid)
            .with_context(|| format!("merge !{} ({})", iid, client.profile().label()))?;
        if !args.json {
            println!("merged !{} ({}): {}", iid, client.profile().label(), mr.state);
        }
        merged.insert(client.profile().label().to_string(), mr);
    }
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&merged).context("serialize merge result")?
        );
    }
    Ok(())
}
