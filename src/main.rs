use std::{io, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::Parser;
use fbcrawl::{
    options::CrawlOptions,
    output::{save_table, Format, COMMENTS_TABLE, POSTS_TABLE},
    processing::{process_comments, process_posts},
    runner::run_facebook_crawling,
    utils::{load_post_links, read_post_links},
};
use log::{debug, info};
use tokio::task;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Facebook post and comment crawler", long_about = None)]
struct Args {
    /// Post links, e.g. https://www.facebook.com/<page>/posts/<id>
    urls: Vec<String>,
    /// File with one post link per line
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,
    /// Directory the tables are written to
    #[arg(short = 'o', long, default_value = "data/crawl")]
    output_dir: PathBuf,
    /// Format of the written tables
    #[arg(short = 'f', long, value_enum, default_value_t = Format::Csv)]
    format: Format,
    /// Also write cleaned tables (deduplicated comments, engagement totals)
    #[arg(short = 'p', long)]
    process: bool,
    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,
    /// Maximum time in seconds to wait for a post page to load
    #[arg(long, default_value_t = 30)]
    navigation_timeout: u64,
    /// Upper bound on scroll iterations per comment thread
    #[arg(long, default_value_t = 1000)]
    max_scrolls: usize,
    /// Pixels per scroll of the comment list
    #[arg(long, default_value_t = 1500)]
    scroll_step: i64,
    /// Pixels of the larger scroll tried once the list stops growing
    #[arg(long, default_value_t = 2500)]
    nudge_step: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut links = args.urls.clone();
    if let Some(path) = &args.input {
        links.extend(
            load_post_links(path).context(format!("could not read links from {:?}", path))?,
        );
    }
    if links.is_empty() {
        links = read_post_links(io::stdin().lock(), io::stdout())
            .context("could not read links from stdin")?;
    }

    let options = CrawlOptions::default_builder()
        .headless(!args.headed)
        .navigation_timeout(Duration::from_secs(args.navigation_timeout))
        .max_scroll_iterations(args.max_scrolls)
        .scroll_step(args.scroll_step)
        .nudge_step(args.nudge_step)
        .build()?;

    debug!("Starting crawler with {:#?}", options);

    println!("\nCrawling data from Facebook posts...");

    // headless_chrome blocks, so the whole batch runs off the async threads
    let result = task::spawn_blocking(move || {
        let progress = |done: usize, total: usize| info!("{}/{} posts processed", done, total);
        run_facebook_crawling(&links, &options, Some(&progress))
    })
    .await
    .context("crawler task failed")??;

    println!("\nDone!");
    println!("Stats:");
    println!("{}", result.stats());

    let dir = &args.output_dir;
    let posts = save_table(dir, POSTS_TABLE, args.format, &result.summaries)?;
    let comments = save_table(dir, COMMENTS_TABLE, args.format, &result.comment_rows)?;
    println!("\nSaved {} and {}", posts.display(), comments.display());

    if args.process {
        println!("\nCleaning data crawled...");
        let posts = save_table(
            dir,
            &format!("{}_processed", POSTS_TABLE),
            args.format,
            &process_posts(&result.summaries),
        )?;
        let comments = save_table(
            dir,
            &format!("{}_processed", COMMENTS_TABLE),
            args.format,
            &process_comments(&result.comment_rows),
        )?;
        println!("Saved {} and {}", posts.display(), comments.display());
    }

    Ok(())
}
