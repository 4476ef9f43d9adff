use super::*;

impl GitlabClient {
    /// Projects the token's user is a member of, most recently active first.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        with_retries("list projects", || {
            let resp = self
                .client
                .get(self.url("/projects"))
                .query(&[
                    ("membership", "true"),
                    ("order_by", "last_activity_at"),
                    ("per_page", "100"),
                ])
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .send()
                .context("list projects request")?;
            self.ensure_ok(resp, "list projects")?
                .json()
                .context("parse projects")
        })
    }
}
