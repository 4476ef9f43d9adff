use super::*;

/// Retry wrapper for idempotent reads. Mutations (merge, comment) go out
/// exactly once.
pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl GitlabClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "unauthorized against {} (token invalid/expired; check --token, GITLAB_TOKEN, or the profile's token)",
                self.profile.base_url
            );
        }
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!(
                "forbidden (the token lacks access to this project; check its scopes and project membership)"
            );
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.profile.token)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.profile.base_url, path)
    }

    /// `namespace/path` refs must be percent-encoded in URLs; numeric ids
    /// pass through the encoder unchanged.
    pub(super) fn encoded_project_ref(&self) -> Result<String> {
        Ok(urlencoding::encode(self.project_ref()?).into_owned())
    }
}
