use std::{
    ffi::OsStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread::sleep,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use headless_chrome::{
    browser::default_executable, protocol::cdp::types::Event, Browser, Element, LaunchOptions, Tab,
};
use serde_json::json;

use crate::{
    dom::{Dom, Node, Query},
    options::CrawlOptions,
};

const MARK_ATTRIBUTE: &str = "data-fbcrawl-query";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,vi;q=0.8";

const VISIBLE_FN: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== "hidden" && style.display !== "none";
}"#;
const ATTRIBUTE_FN: &str = "function(name) { return this.getAttribute(name); }";
const SCROLL_BY_FN: &str = "function(dy) { this.scrollBy(0, dy); }";
const SCROLL_HEIGHT_FN: &str = "function() { return this.scrollHeight; }";

// resolves "idle" once no new resource has been requested for `quiet_ms`
fn get_idle_script(quiet_ms: u128, timeout_ms: u128) -> String {
    format!(
        r#" new Promise((resolve) => {{
            var seen = performance.getEntriesByType("resource").length;
            var quiet = 0;
            var waited = 0;
            var timer = setInterval(() => {{
                var now = performance.getEntriesByType("resource").length;
                if (document.readyState === "complete" && now === seen) {{
                    quiet += 100;
                }} else {{
                    quiet = 0;
                    seen = now;
                }}
                waited += 100;

                if (quiet >= {quiet}) {{
                    clearInterval(timer);
                    resolve("idle");
                }} else if (waited >= {timeout}) {{
                    clearInterval(timer);
                    resolve("timeout");
                }}
            }}, 100);
        }});"#,
        quiet = quiet_ms,
        timeout = timeout_ms
    )
}

// tags every element matching `css` whose rendered text contains `needle`
fn get_mark_script(css: &str, needle: &str, marker: usize) -> String {
    format!(
        r#"(() => {{
            var count = 0;
            document.querySelectorAll({css}).forEach((el) => {{
                var text = (el.innerText || el.textContent || "").toLowerCase();
                if (text.includes({needle})) {{
                    el.setAttribute("{attr}", "{marker}");
                    count += 1;
                }}
            }});
            return count;
        }})()"#,
        css = json!(css),
        needle = json!(needle),
        attr = MARK_ATTRIBUTE,
        marker = marker
    )
}

/// Accepts every alert, confirm and prompt so a dialog never stalls the page.
fn accept_dialogs(tab: &Arc<Tab>) -> Result<()> {
    let weak = Arc::downgrade(tab);
    tab.add_event_listener(Arc::new(move |event: &Event| {
        if let Event::PageJavascriptDialogOpening(opening) = event {
            debug!("accepting dialog: {:?}", opening.params.message);
            if let Some(tab) = weak.upgrade() {
                if let Err(e) = tab.get_dialog().accept(None) {
                    warn!("could not accept dialog: {}", e);
                }
            }
        }
    }))
    .context("could not listen for dialogs")?;
    Ok(())
}

/// Owns the Chrome process and the one tab every post is crawled in.
pub struct BrowserController {
    browser: Browser,
    tab: Arc<Tab>,
    element_timeout: Duration,
    marks: AtomicUsize,
}

impl BrowserController {
    pub fn new(options: &CrawlOptions) -> Result<Self> {
        let path = default_executable().map_err(|e| anyhow!(e))?;
        let launch_options = LaunchOptions::default_builder()
            .path(Some(path))
            .headless(options.headless)
            .sandbox(false)
            .window_size(Some(options.viewport))
            .idle_browser_timeout(options.browser_timeout)
            .args(vec![OsStr::new("--disable-blink-features=AutomationControlled")])
            .build()
            .map_err(|e| anyhow!("invalid launch options: {}", e))?;
        let browser = Browser::new(launch_options).context("browser launching error")?;

        // we create a new incognito window (no context)
        let tab = {
            let ctx = browser
                .new_context()
                .context("could not create incognito context")?;
            ctx.new_tab().context("could not create new tab")?
        };
        tab.set_user_agent(&options.user_agent, Some(ACCEPT_LANGUAGE), None)
            .context("could not set user agent")?;
        tab.set_default_timeout(options.element_timeout);
        accept_dialogs(&tab)?;

        debug!(
            "browser launched (headless: {}, pid: {:?})",
            options.headless,
            browser.get_process_id()
        );

        Ok(BrowserController {
            browser,
            tab,
            element_timeout: options.element_timeout,
            marks: AtomicUsize::new(0),
        })
    }

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .context(format!("could not navigate to {}", url))?
            .wait_until_navigated()
            .context(format!("navigation to {} did not finish", url))?;
        Ok(())
    }

    fn find_by_css(&self, css: &str) -> Vec<Element<'_>> {
        // headless_chrome reports "no match" as an error
        match self.tab.find_elements(css) {
            Ok(elems) => elems,
            Err(e) => {
                trace!("no element for {}: {}", css, e);
                vec![]
            }
        }
    }

    fn find_by_text(&self, css: &str, needle: &str) -> Result<Vec<Element<'_>>> {
        let marker = self.marks.fetch_add(1, Ordering::SeqCst);
        let res = self
            .tab
            .evaluate(&get_mark_script(css, needle, marker), false)
            .context(format!("could not match text {:?} in {}", needle, css))?;

        let count = res.value.and_then(|v| v.as_u64()).unwrap_or(0);
        if count == 0 {
            return Ok(vec![]);
        }
        Ok(self.find_by_css(&format!(r#"[{}="{}"]"#, MARK_ATTRIBUTE, marker)))
    }
}

impl Dom for BrowserController {
    type Node<'a> = ChromeNode<'a>;

    fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        let res = self.navigate(url);
        self.tab.set_default_timeout(self.element_timeout);
        res
    }

    fn wait_for_idle(&self, timeout: Duration) -> Result<()> {
        let res = self
            .tab
            .evaluate(&get_idle_script(500, timeout.as_millis()), true)
            .context("could not wait for network idle")?;

        match res.value.as_ref().and_then(|v| v.as_str()) {
            Some("idle") => Ok(()),
            _ => Err(anyhow!("network not idle after {:?}", timeout)),
        }
    }

    fn wait_for(&self, query: &Query, timeout: Duration) -> Result<()> {
        if query.text().is_none() {
            self.tab
                .wait_for_element_with_custom_timeout(query.selector(), timeout)
                .context(format!("timed out waiting for {}", query.selector()))?;
            return Ok(());
        }

        let deadline = Instant::now() + timeout;
        loop {
            if !self.find_all(query)?.is_empty() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(anyhow!("timed out waiting for {}", query.selector()));
            }
            sleep(Duration::from_millis(250));
        }
    }

    fn find_all(&self, query: &Query) -> Result<Vec<ChromeNode<'_>>> {
        let elements = match query.text() {
            Some(needle) => self.find_by_text(query.selector(), needle)?,
            None => self.find_by_css(query.selector()),
        };
        Ok(elements.into_iter().map(ChromeNode).collect())
    }
}

impl Drop for BrowserController {
    fn drop(&mut self) {
        debug!(
            "closing browser process {:?}...",
            self.browser.get_process_id()
        );
        if let Err(e) = self.tab.close(false) {
            debug!("could not close tab: {}", e);
        }
    }
}

pub struct ChromeNode<'a>(Element<'a>);

impl<'a> ChromeNode<'a> {
    fn call(&self, function: &str, args: Vec<serde_json::Value>) -> Result<Option<serde_json::Value>> {
        Ok(self.0.call_js_fn(function, args, false)?.value)
    }
}

impl<'a> Node for ChromeNode<'a> {
    fn is_visible(&self) -> Result<bool> {
        Ok(self
            .call(VISIBLE_FN, vec![])?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    fn inner_text(&self) -> Result<String> {
        self.0.get_inner_text()
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .call(ATTRIBUTE_FN, vec![json!(name)])?
            .and_then(|v| v.as_str().map(String::from)))
    }

    fn click(&self) -> Result<()> {
        self.0.click()?;
        Ok(())
    }

    fn scroll_by(&self, dy: i64) -> Result<()> {
        self.call(SCROLL_BY_FN, vec![json!(dy)])?;
        Ok(())
    }

    fn scroll_height(&self) -> Result<i64> {
        self.call(SCROLL_HEIGHT_FN, vec![])?
            .and_then(|v| v.as_f64())
            .map(|h| h as i64)
            .ok_or_else(|| anyhow!("scrollHeight is not a number"))
    }

    fn find_all(&self, query: &Query) -> Result<Vec<Self>> {
        let elements = match self.0.find_elements(query.selector()) {
            Ok(elems) => elems,
            Err(_) => return Ok(vec![]),
        };
        Ok(elements
            .into_iter()
            .filter(|el| match query.text() {
                Some(_) => el
                    .get_inner_text()
                    .map(|t| query.matches_text(&t))
                    .unwrap_or(false),
                None => true,
            })
            .map(ChromeNode)
            .collect())
    }
}
