mod run;

use crate::scan::ScanConfig;
use reqwest::Url;

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Scan {
        config: ScanConfig,
        domains: Vec<String>,
        webhook: Option<Url>,
        json: bool,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute or the scan found problems
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
