//! Page binding for the Virtual Trebuchet simulator.
//!
//! Everything tied to the page's markup lives in this file: element ids, the
//! XPaths of the simulate button and the unit/projectile selectors, and the
//! submit-and-wait choreography. If the site changes its markup, this is
//! what breaks.

use std::thread;
use std::time::{Duration, Instant};

use crate::domain::{Parameter, ParameterSet};
use crate::error::AppError;
use crate::webdriver::{ElementRef, Locator, WdClient, WdError};

use super::{RawOutcome, SimError, Simulator};

pub const DEFAULT_PAGE_URL: &str = "http://virtualtrebuchet.com";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

// Site constants.
const SUBMIT_BUTTON: &str = "//*[@id=\"Inputs\"]/table/tbody/tr[22]/td/button";
const METRIC_OPTION: &str = "//*[@id=\"topLeft\"]/div[1]/select/option[1]";
const CUSTOM_PROJECTILE_OPTION: &str = "//*[@id=\"Inputs\"]/table/tbody/tr[15]/td[2]/select/option[1]";
const ERROR_MESSAGES_ID: &str = "errorMessages";

/// How often the wait loop re-checks for results.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Connection settings for a driving session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub webdriver_url: String,
    pub page_url: String,
    /// Per-combination wait budget before a point is skipped.
    pub max_wait_secs: u64,
    pub headless: bool,
}

impl SessionConfig {
    /// Resolve the WebDriver endpoint: explicit flag, else `WEBDRIVER_URL`
    /// from the environment (`.env` supported), else localhost chromedriver.
    pub fn resolve_endpoint(flag: Option<String>) -> String {
        if let Some(url) = flag {
            return url;
        }
        dotenvy::dotenv().ok();
        std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string())
    }
}

/// A live browser session bound to the simulator page.
///
/// Acquired once with [`connect`](TrebuchetSim::connect), released exactly
/// once with [`quit`](TrebuchetSim::quit); the form state on the page
/// persists between submissions, which is what incremental field patching
/// relies on.
pub struct TrebuchetSim {
    wd: WdClient,
    fields: Vec<(Parameter, ElementRef)>,
    submit_button: ElementRef,
    max_wait: Duration,
}

impl TrebuchetSim {
    /// Launch a browser, open the simulator, switch to metric units and the
    /// custom projectile, and resolve every input field once.
    pub fn connect(config: &SessionConfig) -> Result<Self, AppError> {
        let wd = WdClient::new_session(&config.webdriver_url, config.headless).map_err(|e| {
            AppError::driver(format!(
                "Failed to open a browser session at {}: {e}",
                config.webdriver_url
            ))
        })?;

        match Self::bind(&wd, config) {
            Ok((fields, submit_button)) => Ok(Self {
                wd,
                fields,
                submit_button,
                max_wait: Duration::from_secs(config.max_wait_secs),
            }),
            Err(err) => {
                // The session exists; tear it down before reporting.
                let _ = wd.quit();
                Err(err)
            }
        }
    }

    fn bind(
        wd: &WdClient,
        config: &SessionConfig,
    ) -> Result<(Vec<(Parameter, ElementRef)>, ElementRef), AppError> {
        wd.navigate(&config.page_url)
            .map_err(|e| AppError::driver(format!("Failed to open {}: {e}", config.page_url)))?;

        // Metric units, then the custom projectile so that projectile mass
        // and diameter become editable fields.
        for xpath in [METRIC_OPTION, CUSTOM_PROJECTILE_OPTION] {
            let option = wd.find(Locator::XPath(xpath)).map_err(|e| {
                AppError::driver(format!("Simulator page is missing an expected control: {e}"))
            })?;
            wd.click(&option)
                .map_err(|e| AppError::driver(format!("Failed to select a page option: {e}")))?;
        }

        let mut fields = Vec::with_capacity(Parameter::ALL.len());
        for param in Parameter::ALL {
            let el = wd
                .find(Locator::Css(&format!("#{}", param.field_id())))
                .map_err(|e| {
                    AppError::driver(format!(
                        "Input field `{}` not found on the page: {e}",
                        param.field_id()
                    ))
                })?;
            fields.push((param, el));
        }

        let submit_button = wd
            .find(Locator::XPath(SUBMIT_BUTTON))
            .map_err(|e| AppError::driver(format!("Simulate button not found: {e}")))?;

        Ok((fields, submit_button))
    }

    /// Number of resolved input fields (for `treb probe` reporting).
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// End the browser session.
    pub fn quit(self) -> Result<(), AppError> {
        self.wd
            .quit()
            .map_err(|e| AppError::driver(format!("Failed to close the browser session: {e}")))
    }

    /// Patch one input field, but only when its on-page value differs.
    fn patch_field(&self, el: &ElementRef, value: f64) -> Result<(), WdError> {
        let wanted = fmt_value(value);
        let current = self.wd.value_property(el)?;
        if current == wanted {
            return Ok(());
        }
        self.wd.clear(el)?;
        self.wd.send_keys(el, &wanted)
    }

    /// One visibility probe of the result panel. `Ok(None)` means "not yet".
    fn read_result_field(&self, id: &str) -> Result<Option<String>, WdError> {
        let el = match self.wd.find(Locator::Css(&format!("#{id}"))) {
            Ok(el) => el,
            Err(e) if e.is_no_such_element() => return Ok(None),
            Err(e) => return Err(e),
        };
        if !self.wd.displayed(&el)? {
            return Ok(None);
        }
        self.wd.text(&el).map(Some)
    }

    fn try_read_results(&self) -> Result<Option<RawOutcome>, WdError> {
        let Some(max_distance) = self.read_result_field("maxDistance")? else {
            return Ok(None);
        };
        let Some(energy_efficiency) = self.read_result_field("energyEfficiency")? else {
            return Ok(None);
        };
        let Some(range_efficiency) = self.read_result_field("rangeEfficiency")? else {
            return Ok(None);
        };
        let Some(release_velocity) = self.read_result_field("releaseVelocity")? else {
            return Ok(None);
        };
        Ok(Some(RawOutcome {
            max_distance,
            energy_efficiency,
            range_efficiency,
            release_velocity,
        }))
    }

    /// Poll until every result element is visible, then scrape them.
    fn await_results(&self) -> Result<RawOutcome, SimError> {
        let deadline = Instant::now() + self.max_wait;
        loop {
            match self.try_read_results() {
                Ok(Some(raw)) => return Ok(raw),
                Ok(None) => {}
                Err(e) => return Err(SimError::Driver(e.to_string())),
            }
            if Instant::now() >= deadline {
                return Err(SimError::Timeout(self.max_wait.as_secs()));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Simulator for TrebuchetSim {
    fn submit(&mut self, inputs: &ParameterSet) -> Result<RawOutcome, SimError> {
        for (param, el) in &self.fields {
            self.patch_field(el, inputs.get(*param))
                .map_err(|e| SimError::Driver(format!("patching `{}`: {e}", param.field_id())))?;
        }

        self.wd
            .click(&self.submit_button)
            .map_err(|e| SimError::Driver(format!("clicking simulate: {e}")))?;

        let raw = self.await_results()?;

        // The page reports unphysical configurations in a text field rather
        // than failing the computation outright.
        let error_text = self
            .wd
            .find(Locator::Css(&format!("#{ERROR_MESSAGES_ID}")))
            .and_then(|el| self.wd.text(&el))
            .map_err(|e| SimError::Driver(format!("reading the error field: {e}")))?;
        if !error_text.trim().is_empty() {
            return Err(SimError::Rejected(error_text.trim().to_string()));
        }

        Ok(raw)
    }
}

/// Format a value the way the page renders numbers (no trailing `.0` on
/// whole numbers), so the differs-from-current check compares like with
/// like.
fn fmt_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_format_without_a_fraction() {
        assert_eq!(fmt_value(45.0), "45");
        assert_eq!(fmt_value(0.0), "0");
        assert_eq!(fmt_value(300.0), "300");
    }

    #[test]
    fn fractional_values_keep_their_digits() {
        assert_eq!(fmt_value(0.9), "0.9");
        assert_eq!(fmt_value(26.25), "26.25");
        assert_eq!(fmt_value(4.5), "4.5");
    }
}
