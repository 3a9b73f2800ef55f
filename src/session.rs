//! Browser session: launch, log into the portal and open the menu page.

use crate::config::{BrowserConfig, Config};
use crate::page::EokaPage;
use crate::{Error, Result};
use eoka::{Browser, Page};
use tracing::{debug, info, warn};

/// Idle time that counts as "page finished loading".
const NETWORK_IDLE_MS: u64 = 500;
const NETWORK_TIMEOUT_MS: u64 = 10_000;

/// Clicks the first link whose visible text equals the argument.
const CLICK_LINK_BY_TEXT_JS: &str = r#"((text) => {
    const link = Array.from(document.querySelectorAll('a'))
        .find(a => (a.textContent || '').trim() === text);
    if (!link) return false;
    link.click();
    return true;
})"#;

/// A launched browser with the page the portal is driven through.
///
/// The session owns the browser for the whole run; [`close`](Self::close)
/// consumes it so the browser is released exactly once.
pub struct Session {
    browser: Browser,
    page: Page,
}

impl Session {
    /// Launch the browser with an empty page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        info!("Starting browser...");
        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// The page as seen by the ordering logic.
    pub fn accessor(&self) -> EokaPage<'_> {
        EokaPage::new(&self.page)
    }

    /// Load the portal and submit the login form.
    ///
    /// Fails with [`Error::Login`] if the page can't be loaded or one of the
    /// form controls is missing.
    pub async fn login(&self, config: &Config) -> Result<()> {
        let login = &config.login;
        if login.username.is_empty() || login.password.is_empty() {
            return Err(Error::Config(
                "login.username and login.password must be set".into(),
            ));
        }

        info!("Loading login page...");
        self.page
            .goto(&config.portal.url)
            .await
            .map_err(|e| Error::Login(format!("could not load {}: {}", config.portal.url, e)))?;
        self.settle_network().await;

        info!("Attempting to log in...");
        for selector in [&login.username_field, &login.password_field, &login.submit] {
            if !self.element_exists(selector).await? {
                return Err(Error::Login(format!("no element matches '{}'", selector)));
            }
        }

        self.page.fill(&login.username_field, &login.username).await?;
        self.page.fill(&login.password_field, &login.password).await?;
        self.page.click(&login.submit).await?;
        self.settle_network().await;
        Ok(())
    }

    /// Follow the dashboard link to the weekly menu and wait for it to render.
    ///
    /// Fails with [`Error::MenuPage`] if the link isn't there.
    pub async fn open_menu(&self, config: &Config) -> Result<()> {
        info!("Loading menu ordering page...");
        let js = format!(
            "{}({})",
            CLICK_LINK_BY_TEXT_JS,
            serde_json::to_string(&config.menu.link_text)?
        );
        let clicked: bool = self.page.evaluate(&js).await?;
        if !clicked {
            return Err(Error::MenuPage(format!(
                "link '{}' not found",
                config.menu.link_text
            )));
        }

        self.settle_network().await;
        self.page.wait(config.timing.settle_ms).await;
        Ok(())
    }

    /// Save a screenshot if `on_failure.screenshot` is configured.
    pub async fn save_failure_screenshot(&self, config: &Config) {
        let Some(template) = config
            .on_failure
            .as_ref()
            .and_then(|f| f.screenshot.as_deref())
        else {
            return;
        };

        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        let path = template.replace("{timestamp}", &timestamp);
        info!("Saving failure screenshot to: {}", path);
        match self.page.screenshot().await {
            Ok(data) => {
                if let Err(e) = std::fs::write(&path, data) {
                    warn!("Failed to save screenshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to take screenshot: {}", e),
        }
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }

    async fn element_exists(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "!!document.querySelector({})",
            serde_json::to_string(selector)?
        );
        Ok(self.page.evaluate(&js).await?)
    }

    async fn settle_network(&self) {
        if let Err(e) = self
            .page
            .wait_for_network_idle(NETWORK_IDLE_MS, NETWORK_TIMEOUT_MS)
            .await
        {
            debug!("Network did not go idle: {}", e);
        }
    }
}
