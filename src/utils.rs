use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
    time::Duration,
};

use rand::Rng;

use crate::{selectors::POST_URL_RE, types::ScrapeError};

/// Source of pauses. Production code sleeps, tests record.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A pause drawn uniformly from `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub min: Duration,
    pub max: Duration,
}

impl Pause {
    pub fn fixed(d: Duration) -> Self {
        Pause { min: d, max: d }
    }

    pub fn between(min: Duration, max: Duration) -> Self {
        if min <= max {
            Pause { min, max }
        } else {
            Pause { min: max, max: min }
        }
    }

    pub fn none() -> Self {
        Pause::fixed(Duration::ZERO)
    }

    pub fn sample(&self) -> Duration {
        jitter(self.min, self.max)
    }
}

pub fn jitter(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let mut rng = rand::thread_rng();
    let rndm = rng.gen_range(min.as_secs_f64()..=max.as_secs_f64());
    Duration::from_secs_f64(rndm)
}

pub fn pause(clock: &dyn Clock, pause: &Pause) {
    let d = pause.sample();
    if d.is_zero() {
        return;
    }
    debug!("sleeping for {:.2} seconds", d.as_secs_f64());
    clock.sleep(d);
}

pub fn is_post_url(url: &str) -> bool {
    POST_URL_RE.is_match(url)
}

/// Checks the whole list before anything is crawled.
pub fn check_post_links(links: &[String]) -> Result<(), ScrapeError> {
    if links.is_empty() {
        return Err(ScrapeError::Validation(
            "no post links given, at least one is required".into(),
        ));
    }
    for link in links {
        if !is_post_url(link) {
            return Err(ScrapeError::Validation(format!("invalid post link: {}", link)));
        }
    }
    Ok(())
}

/// Prompts for links one per line until `done` or end of input.
pub fn read_post_links<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<Vec<String>> {
    writeln!(out, "Enter Facebook post links (type 'done' to finish):")?;
    let mut links = vec![];
    let mut lines = input.lines();
    loop {
        write!(out, "Link: ")?;
        out.flush()?;
        let line = match lines.next() {
            Some(l) => l?,
            None => break,
        };
        let link = line.trim();
        if link.eq_ignore_ascii_case("done") {
            break;
        }
        if !link.is_empty() {
            links.push(link.to_string());
        }
    }
    Ok(links)
}

/// Reads one link per line, skipping blanks and `#` comments.
pub fn load_post_links(path: &Path) -> io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}
