use super::*;

impl GitlabClient {
    pub fn current_user(&self) -> Result<User> {
        with_retries("fetch current user", || {
            let resp = self
                .client
                .get(self.url("/user"))
                .header(reqwest::header::AUTHORIZATION, self.auth())
                .send()
                .context("current user request")?;
            self.ensure_ok(resp, "current user")?
                .json()
                .context("parse current user")
        })
    }
}
