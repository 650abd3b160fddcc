//! An in-memory stand-in for a rendered post page.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    time::Duration,
};

use anyhow::anyhow;
use fbcrawl::{
    dom::{Dom, Node, Query},
    options::CrawlOptions,
    selectors::{COMMENT_CONTAINER, COMMENT_TEXT},
    utils::{Clock, Pause},
};

/// Records pauses instead of sleeping.
#[derive(Default)]
pub struct FakeClock {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl Clock for FakeClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

/// Options with the production defaults but deterministic pauses.
pub fn test_options() -> CrawlOptions {
    CrawlOptions::default_builder()
        .scroll_pause(Pause::fixed(Duration::from_millis(1500)))
        .between_posts(Pause::fixed(Duration::from_millis(1500)))
        .build()
        .unwrap()
}

pub struct Scroll {
    pub base_height: i64,
    pub row_height: i64,
    pub total: usize,
    pub per_scroll: usize,
    pub loaded: Cell<usize>,
    pub calls: Cell<usize>,
    pub steps: RefCell<Vec<i64>>,
    // scrolls shorter than this load nothing
    pub min_step: i64,
    // keeps growing no matter how much has loaded
    pub endless: bool,
}

impl Scroll {
    pub fn height(&self) -> i64 {
        if self.endless {
            return self.base_height + self.calls.get() as i64 * self.row_height;
        }
        self.base_height + self.loaded.get() as i64 * self.row_height
    }
}

pub struct FakeElement {
    pub selectors: Vec<String>,
    pub text: String,
    pub visible: bool,
    pub attrs: HashMap<String, String>,
    pub children: Vec<FakeElement>,
    pub fail_reads: bool,
    // successive inner_text results, `None` being a failed read; `text` after
    pub readings: RefCell<VecDeque<Option<String>>>,
    pub clicks: Cell<usize>,
    pub scroll: Option<Scroll>,
    // only rendered once this many comments have been loaded
    pub lazy_index: Option<usize>,
}

impl FakeElement {
    pub fn new(selector: &str, text: &str) -> Self {
        FakeElement {
            selectors: vec![selector.into()],
            text: text.into(),
            visible: true,
            attrs: HashMap::new(),
            children: vec![],
            fail_reads: false,
            readings: RefCell::new(VecDeque::new()),
            clicks: Cell::new(0),
            scroll: None,
            lazy_index: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn broken(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Text that changes from one read to the next, as counters do while
    /// they render.
    pub fn reads(self, readings: &[Option<&str>]) -> Self {
        *self.readings.borrow_mut() = readings.iter().map(|r| r.map(String::from)).collect();
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: FakeElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn emoji(alt: &str) -> Self {
        FakeElement::new("img[alt]", "").attr("alt", alt)
    }

    pub fn comment(text: &str) -> Self {
        FakeElement::new(COMMENT_TEXT.selector(), text)
    }

    fn matches(&self, query: &Query) -> bool {
        self.selectors.iter().any(|s| s == query.selector()) && query.matches_text(&self.text)
    }
}

#[derive(Default)]
pub struct Fixture {
    pub elements: Vec<FakeElement>,
    pub navigation_fails: bool,
    pub idle_fails: bool,
}

impl Fixture {
    pub fn with(mut self, element: FakeElement) -> Self {
        self.elements.push(element);
        self
    }

    fn container(&self) -> Option<&Scroll> {
        self.elements.iter().find_map(|e| e.scroll.as_ref())
    }

    /// A comment container holding `total` comments, `per_scroll` of which
    /// render with every scroll. `initial` are rendered up front.
    pub fn virtualized(total: usize, initial: usize, per_scroll: usize) -> Self {
        Fixture::virtualized_with(total, initial, per_scroll, 0)
    }

    /// Like [`Fixture::virtualized`], but only scrolls of at least `min_step`
    /// pixels load anything.
    pub fn virtualized_with(total: usize, initial: usize, per_scroll: usize, min_step: i64) -> Self {
        let mut fixture = Fixture::default().with(container(Scroll {
            base_height: 800,
            row_height: 120,
            total,
            per_scroll,
            loaded: Cell::new(initial.min(total)),
            calls: Cell::new(0),
            steps: RefCell::new(vec![]),
            min_step,
            endless: false,
        }));
        for i in 0..total {
            let mut c = FakeElement::comment(&format!("comment {}", i));
            c.lazy_index = Some(i);
            fixture.elements.push(c);
        }
        fixture
    }
}

pub fn container(scroll: Scroll) -> FakeElement {
    let mut el = FakeElement::new(COMMENT_CONTAINER.selector(), "");
    el.scroll = Some(scroll);
    el
}

pub fn endless_container() -> FakeElement {
    container(Scroll {
        base_height: 800,
        row_height: 120,
        total: 0,
        per_scroll: 0,
        loaded: Cell::new(0),
        calls: Cell::new(0),
        steps: RefCell::new(vec![]),
        min_step: 0,
        endless: true,
    })
}

/// A page that serves one fixture per url.
#[derive(Default)]
pub struct FakePage {
    pub fixtures: HashMap<String, Fixture>,
    pub current: RefCell<Option<String>>,
    pub visited: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn single(fixture: Fixture) -> Self {
        let page = FakePage::default().serve("https://www.facebook.com/test/posts/1", fixture);
        *page.current.borrow_mut() = Some("https://www.facebook.com/test/posts/1".into());
        page
    }

    pub fn serve(mut self, url: &str, fixture: Fixture) -> Self {
        self.fixtures.insert(url.into(), fixture);
        self
    }

    fn fixture(&self) -> anyhow::Result<&Fixture> {
        let current = self.current.borrow();
        let url = current.as_ref().ok_or_else(|| anyhow!("no page loaded"))?;
        self.fixtures
            .get(url)
            .ok_or_else(|| anyhow!("nothing served at {}", url))
    }

    pub fn scroll(&self) -> &Scroll {
        self.fixture().unwrap().container().unwrap()
    }

    fn rendered(&self, fixture: &Fixture, el: &FakeElement) -> bool {
        match el.lazy_index {
            Some(i) => fixture.container().map(|s| i < s.loaded.get()).unwrap_or(true),
            None => true,
        }
    }
}

impl Dom for FakePage {
    type Node<'a> = FakeNode<'a>;

    fn goto(&self, url: &str, timeout: Duration) -> anyhow::Result<()> {
        self.visited.borrow_mut().push(url.into());
        let fixture = self
            .fixtures
            .get(url)
            .ok_or_else(|| anyhow!("net::ERR_NAME_NOT_RESOLVED at {}", url))?;
        if fixture.navigation_fails {
            return Err(anyhow!("navigation timed out after {:?}", timeout));
        }
        *self.current.borrow_mut() = Some(url.into());
        Ok(())
    }

    fn wait_for_idle(&self, timeout: Duration) -> anyhow::Result<()> {
        if self.fixture()?.idle_fails {
            return Err(anyhow!("network not idle after {:?}", timeout));
        }
        Ok(())
    }

    fn wait_for(&self, query: &Query, timeout: Duration) -> anyhow::Result<()> {
        if self.find_all(query)?.is_empty() {
            return Err(anyhow!("timed out after {:?}", timeout));
        }
        Ok(())
    }

    fn find_all(&self, query: &Query) -> anyhow::Result<Vec<FakeNode<'_>>> {
        let fixture = self.fixture()?;
        Ok(fixture
            .elements
            .iter()
            .filter(|el| el.matches(query) && self.rendered(fixture, el))
            .map(|el| FakeNode { el })
            .collect())
    }
}

pub struct FakeNode<'a> {
    el: &'a FakeElement,
}

impl<'a> FakeNode<'a> {
    fn check(&self) -> anyhow::Result<()> {
        if self.el.fail_reads {
            return Err(anyhow!("element detached"));
        }
        Ok(())
    }
}

impl<'a> Node for FakeNode<'a> {
    fn is_visible(&self) -> anyhow::Result<bool> {
        self.check()?;
        Ok(self.el.visible)
    }

    fn inner_text(&self) -> anyhow::Result<String> {
        self.check()?;
        match self.el.readings.borrow_mut().pop_front() {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(anyhow!("element is not attached to the page")),
            None => Ok(self.el.text.clone()),
        }
    }

    fn attribute(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.check()?;
        Ok(self.el.attrs.get(name).cloned())
    }

    fn click(&self) -> anyhow::Result<()> {
        self.check()?;
        self.el.clicks.set(self.el.clicks.get() + 1);
        Ok(())
    }

    fn scroll_by(&self, dy: i64) -> anyhow::Result<()> {
        self.check()?;
        let scroll = self
            .el
            .scroll
            .as_ref()
            .ok_or_else(|| anyhow!("element is not scrollable"))?;
        scroll.calls.set(scroll.calls.get() + 1);
        scroll.steps.borrow_mut().push(dy);
        if dy < scroll.min_step {
            return Ok(());
        }
        let loaded = scroll.loaded.get();
        scroll
            .loaded
            .set((loaded + scroll.per_scroll).min(scroll.total));
        Ok(())
    }

    fn scroll_height(&self) -> anyhow::Result<i64> {
        self.check()?;
        Ok(self.el.scroll.as_ref().map(|s| s.height()).unwrap_or(0))
    }

    fn find_all(&self, query: &Query) -> anyhow::Result<Vec<Self>> {
        self.check()?;
        Ok(self
            .el
            .children
            .iter()
            .filter(|c| c.matches(query))
            .map(|el| FakeNode { el })
            .collect())
    }
}
