use super::*;

impl GitlabClient {
    pub fn list_merge_requests(&self, state: Option<&str>) -> Result<Vec<MergeRequest>> {
        let project = self.encoded_project_ref()?;
        with_retries("list merge requests", || {
            let mut req = self
                .client
                .get(self.url(&format!("/projects/{}/merge_requests", project)))
                .query(&[("per_page", "100")])
                .header(reqwest::header::AUTHORIZATION, self.auth());
            if let Some(state) = state.filter(|s| *s != "all") {
                req = req.query(&[("state", state)]);
            }
            let resp = req.send().context("list merge requests request")?;
            self.ensure_ok(resp, "list merge requests")?
                .json()
                .context("parse merge requests")
        })
    }

    /// Open merge requests in this profile's project assigned to `user`.
    pub fn list_assigned_merge_requests(&self, user: &User) -> Result<Vec<MergeRequest>> {
        let project = self.encoded_project_ref()?;
        let assignee = user.id.to_string();
        with_retries("list assigned merge requests", || {
            let resp = self
                .client
                .get(self.url(&format!("/projects/{}/merge_requests", project)))
                .query(&[
                    ("state", "opened"),
                    ("scope", "all"),
                    ("assignee_id", assignee.as_str()),
                    ("per_page", "100"),
                ])
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .send()
                .context("list assigned merge requests request")?;
            self.ensure_ok(resp, "list assigned merge requests")?
                .json()
                .context("parse assigned merge requests")
        })
    }

    pub fn list_notes(&self, iid: u64) -> Result<Vec<Note>> {
        let project = self.encoded_project_ref()?;
        with_retries("list notes", || {
            let resp = self
                .client
                .get(self.url(&format!(
                    "/projects/{}/merge_requests/{}/notes",
                    project, iid
                )))
                .query(&[("per_page", "100"), ("sort", "desc")])
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .send()
                .context("list notes request")?;
            self.ensure_ok(resp, "list notes")?
                .json()
                .context("parse notes")
        })
    }

    pub fn create_note(&self, iid: u64, body: &str) -> Result<Note> {
        let project = self.encoded_project_ref()?;
        let resp = self
            .client
            .post(self.url(&format!(
                "/projects/{}/merge_requests/{}/notes",
                project, iid
            )))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&serde_json::json!({ "body": body }))
            .send()
            .context("create note request")?;
        self.ensure_ok(resp, "create note")?
            .json()
            .context("parse created note")
    }

    pub fn merge(&self, iid: u64) -> Result<MergeRequest> {
        let project = self.encoded_project_ref()?;
        let resp = self
            .client
            .put(self.url(&format!(
                "/projects/{}/merge_requests/{}/merge",
                project, iid
            )))
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .send()
            .context("merge request")?;
        self.ensure_ok(resp, "merge")?
            .json()
            .context("parse merge response")
    }
}

/// Post a comment, then re-fetch the notes and require the new note to be
/// present. A write that does not read back counts as failed.
pub fn post_comment_verified(client: &GitlabClient, iid: u64, body: &str) -> Result<Note> {
    let note = client.create_note(iid, body)?;
    let notes = client.list_notes(iid)?;
    if !notes.iter().any(|n| n.id == note.id) {
        anyhow::bail!(
            "comment on !{} did not appear when re-fetched (note id {})",
            iid,
            note.id
        );
    }
    Ok(note)
}
