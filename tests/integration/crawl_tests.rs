//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! register → robots → crawl → index cycle against a temporary database.
//! The HTTPS attempt against a plain-HTTP mock server fails at the TLS
//! handshake, so every domain here registers over HTTP.

use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use sumi_indexer::config::{Config, CrawlerConfig, DatabaseConfig, UserAgentConfig};
use sumi_indexer::crawler::{read_domain_list, BatchRunner, Crawler};
use sumi_indexer::state::{AbortReason, CrawlPhase, PathOutcome};
use sumi_indexer::storage::{SqliteStorage, Storage};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `db_path`
fn create_test_config(db_path: &Path, max_depth: u32, timeout_secs: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            request_timeout_secs: timeout_secs,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        database: DatabaseConfig {
            path: db_path.to_string_lossy().into_owned(),
        },
    }
}

struct TestEnv {
    server: MockServer,
    domain: String,
    db_path: PathBuf,
    _dir: TempDir,
}

impl TestEnv {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let domain = server.address().to_string();
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("index.db");

        Self {
            server,
            domain,
            db_path,
            _dir: dir,
        }
    }

    fn crawler(&self, max_depth: u32) -> Crawler {
        self.crawler_with_timeout(max_depth, 5)
    }

    fn crawler_with_timeout(&self, max_depth: u32, timeout_secs: u64) -> Crawler {
        let config = create_test_config(&self.db_path, max_depth, timeout_secs);
        let storage = SqliteStorage::new(&self.db_path).unwrap();
        Crawler::new(&config, Arc::new(Mutex::new(storage))).unwrap()
    }

    /// Opens a second, raw connection for assertions and fault injection
    fn raw_connection(&self) -> rusqlite::Connection {
        rusqlite::Connection::open(&self.db_path).unwrap()
    }

    async fn mount_robots(&self, body: &str) {
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    async fn mount_page(&self, route: &str, body: &str) {
        self.mount_page_expecting(route, body, None).await;
    }

    async fn mount_page_expecting(&self, route: &str, body: &str, hits: Option<u64>) {
        let mock = Mock::given(method("GET")).and(path(route)).respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        );
        let mock = match hits {
            Some(n) => mock.expect(n),
            None => mock,
        };
        mock.mount(&self.server).await;
    }
}

fn page_id(storage: &SqliteStorage, domain: &str, url_path: &str) -> Option<i64> {
    let domain = storage.find_domain(domain).unwrap()?;
    storage
        .find_page(domain.id, url_path)
        .unwrap()
        .map(|page| page.id)
}

fn term_frequency(storage: &SqliteStorage, page_id: i64, term: &str) -> Option<u32> {
    storage
        .page_terms(page_id)
        .unwrap()
        .into_iter()
        .find(|posting| posting.term == term)
        .map(|posting| posting.term_frequency)
}

/// Asserts that every term's document frequency equals its posting count
fn assert_document_frequencies_consistent(conn: &rusqlite::Connection) {
    let mut stmt = conn
        .prepare(
            "SELECT t.term, t.document_frequency, COUNT(pt.page_id)
             FROM terms t LEFT JOIN page_terms pt ON pt.term_id = t.term_id
             GROUP BY t.term_id",
        )
        .unwrap();

    let rows: Vec<(String, i64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    let pages: i64 = conn
        .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))
        .unwrap();

    for (term, df, postings) in rows {
        assert_eq!(df, postings, "document frequency drift for '{}'", term);
        assert!(df <= pages, "'{}' appears on more pages than exist", term);
    }
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let env = TestEnv::start().await;
    env.mount_robots("User-agent: *\nDisallow: /admin\n").await;
    env.mount_page(
        "/",
        &format!(
            r#"<html><head><title>Home</title></head><body>
            <p>Cats and dogs run. Dogs run fast.</p>
            <a href="/about">About</a>
            <a href="http://{}/contact">Contact</a>
            </body></html>"#,
            env.domain
        ),
    )
    .await;
    env.mount_page("/about", "<p>About the dogs</p>").await;
    env.mount_page("/contact", "<p>Write to us</p>").await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.phase, CrawlPhase::Done);
    assert!(report.abort.is_none());
    assert_eq!(report.pages_indexed(), 3);

    let storage = crawler.storage().lock();
    assert_eq!(storage.count_domains().unwrap(), 1);
    assert_eq!(storage.count_pages().unwrap(), 3);

    let root = page_id(&storage, &env.domain, "/").unwrap();
    assert_eq!(term_frequency(&storage, root, "dog"), Some(2));
    assert_eq!(term_frequency(&storage, root, "run"), Some(2));
    assert_eq!(term_frequency(&storage, root, "cat"), Some(1));

    // "/" and "/about" both mention dogs.
    assert_eq!(storage.find_term("dog").unwrap().unwrap().document_frequency, 2);
    assert!(storage.count_stems().unwrap() > 0);
    drop(storage);

    assert_document_frequencies_consistent(&env.raw_connection());
}

#[tokio::test]
async fn test_root_disallowed_creates_no_pages() {
    let env = TestEnv::start().await;
    env.mount_robots("User-agent: *\nDisallow: /\n").await;
    // The registration probe is the only request "/" ever sees.
    env.mount_page_expecting("/", "<a href=\"/page\">page</a>", Some(1))
        .await;
    env.mount_page_expecting("/page", "<p>hidden</p>", Some(0))
        .await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.phase, CrawlPhase::Done);
    assert_eq!(report.abort, Some(AbortReason::RootDisallowed));
    assert_eq!(report.outcomes.total(), 0);
    assert_eq!(crawler.storage().lock().count_pages().unwrap(), 0);
}

#[tokio::test]
async fn test_other_agents_rules_do_not_apply() {
    let env = TestEnv::start().await;
    env.mount_robots("User-agent: OtherBot\nDisallow: /\n\nUser-agent: *\nDisallow: /tmp\n")
        .await;
    env.mount_page("/", "<p>welcome</p>").await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert!(report.abort.is_none());
    assert_eq!(report.pages_indexed(), 1);
}

#[tokio::test]
async fn test_disallowed_path_never_fetched() {
    let env = TestEnv::start().await;
    env.mount_robots("User-agent: *\nDisallow: /private\n").await;
    env.mount_page(
        "/",
        r#"<a href="/private/secret">secret</a><a href="/public">public</a>"#,
    )
    .await;
    env.mount_page_expecting("/private/secret", "<p>secret</p>", Some(0))
        .await;
    env.mount_page("/public", "<p>public</p>").await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.outcomes.get(PathOutcome::Disallowed), 1);
    assert_eq!(report.pages_indexed(), 2);

    let storage = crawler.storage().lock();
    assert!(page_id(&storage, &env.domain, "/private/secret").is_none());
    assert!(page_id(&storage, &env.domain, "/public").is_some());
}

#[tokio::test]
async fn test_redirect_into_disallowed_path_not_followed() {
    let env = TestEnv::start().await;
    env.mount_robots("User-agent: *\nDisallow: /private\n").await;
    env.mount_page("/", r#"<p>home</p><a href="/public">public</a>"#)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/private/secret"))
        .mount(&env.server)
        .await;
    env.mount_page_expecting("/private/secret", "<p>classified</p>", Some(0))
        .await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 1);
    assert_eq!(report.outcomes.get(PathOutcome::FetchFailed), 1);

    let storage = crawler.storage().lock();
    assert!(page_id(&storage, &env.domain, "/public").is_none());
    assert_eq!(storage.count_pages().unwrap(), 1);
    // Only "home" and "public" from the root page.
    assert_eq!(storage.count_terms().unwrap(), 2);
}

#[tokio::test]
async fn test_domain_case_does_not_split_index() {
    let env = TestEnv::start().await;
    env.mount_page("/", "<p>home</p>").await;
    let port = env.server.address().port();

    let crawler = env.crawler(1);
    let first = crawler
        .crawl_domain(&format!("LocalHost:{}", port))
        .await
        .unwrap();
    assert_eq!(first.domain, format!("localhost:{}", port));
    assert_eq!(first.pages_indexed(), 1);

    let second = crawler
        .crawl_domain(&format!("localhost:{}", port))
        .await
        .unwrap();
    assert_eq!(second.pages_indexed(), 0);

    let storage = crawler.storage().lock();
    assert_eq!(storage.count_domains().unwrap(), 1);
    assert_eq!(storage.count_pages().unwrap(), 1);
}

#[tokio::test]
async fn test_depth_bound_respected() {
    let env = TestEnv::start().await;
    env.mount_page("/", r#"<a href="/level1">one</a>"#).await;
    env.mount_page("/level1", r#"<a href="/level2">two</a>"#).await;
    env.mount_page_expecting("/level2", r#"<a href="/level3">three</a>"#, Some(0))
        .await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 2);
    assert_eq!(report.outcomes.get(PathOutcome::DepthExceeded), 1);
    assert_eq!(crawler.storage().lock().count_pages().unwrap(), 2);
}

#[tokio::test]
async fn test_depth_zero_indexes_only_root() {
    let env = TestEnv::start().await;
    env.mount_page("/", r#"<a href="/child">child</a>"#).await;
    env.mount_page_expecting("/child", "<p>child</p>", Some(0))
        .await;

    let crawler = env.crawler(0);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 1);
    assert_eq!(report.outcomes.get(PathOutcome::DepthExceeded), 1);
}

#[tokio::test]
async fn test_link_cycle_visits_each_path_once() {
    let env = TestEnv::start().await;
    env.mount_page("/", r#"<a href="/a">a</a><a href="/b">b</a>"#)
        .await;
    env.mount_page_expecting("/a", r#"<a href="/b">b</a><a href="/">home</a>"#, Some(1))
        .await;
    env.mount_page_expecting("/b", r#"<a href="/a">a</a>"#, Some(1))
        .await;

    let crawler = env.crawler(3);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 3);
    assert!(report.outcomes.get(PathOutcome::AlreadyScraped) >= 2);
    assert_eq!(crawler.scraped().count(&env.domain), 3);
}

#[tokio::test]
async fn test_off_host_and_relative_links_not_followed() {
    let env = TestEnv::start().await;
    env.mount_page(
        "/",
        r##"<a href="https://other.example/x">other</a>
           <a href="relative.html">relative</a>
           <a href="mailto:someone@example.com">mail</a>
           <a href="#top">top</a>
           <a href="/ok?ref=home#frag">ok</a>"##,
    )
    .await;
    env.mount_page_expecting("/relative.html", "<p>nope</p>", Some(0))
        .await;
    env.mount_page("/ok", "<p>ok</p>").await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 2);
    let storage = crawler.storage().lock();
    assert!(page_id(&storage, &env.domain, "/ok").is_some());
    assert!(page_id(&storage, &env.domain, "/relative.html").is_none());
}

#[tokio::test]
async fn test_non_success_pages_skipped() {
    let env = TestEnv::start().await;
    env.mount_page(
        "/",
        r#"<a href="/missing">m</a><a href="/broken">b</a><a href="/fine">f</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&env.server)
        .await;
    env.mount_page("/fine", "<p>fine</p>").await;

    let crawler = env.crawler(1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    // Unmatched "/missing" gets wiremock's default 404.
    assert_eq!(report.outcomes.get(PathOutcome::FetchFailed), 2);
    assert_eq!(report.pages_indexed(), 2);
    assert!(!crawler.scraped().contains(&env.domain, "/missing"));
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let env = TestEnv::start().await;
    // Probe plus one fetch, both from the first run only.
    env.mount_page_expecting("/", r#"<p>dogs</p><a href="/about">about dogs</a>"#, Some(2))
        .await;
    env.mount_page_expecting("/about", "<p>more dogs</p>", Some(1))
        .await;

    let first = env.crawler(1);
    let report = first.crawl_domain(&env.domain).await.unwrap();
    assert_eq!(report.pages_indexed(), 2);
    drop(first);

    // A fresh crawler has empty caches; the store must carry the run.
    let second = env.crawler(1);
    let report = second.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.pages_indexed(), 0);
    assert_eq!(report.outcomes.get(PathOutcome::AlreadyIndexed), 1);

    let storage = second.storage().lock();
    assert_eq!(storage.count_domains().unwrap(), 1);
    assert_eq!(storage.count_pages().unwrap(), 2);
    assert_eq!(storage.find_term("dog").unwrap().unwrap().document_frequency, 2);
    drop(storage);

    assert_document_frequencies_consistent(&env.raw_connection());
}

#[tokio::test]
async fn test_index_failure_rolls_back_page() {
    let env = TestEnv::start().await;
    env.mount_page(
        "/",
        r#"<p>alpha</p><a href="/bad">x</a><a href="/good">y</a>"#,
    )
    .await;
    env.mount_page("/bad", "<p>alpha beta</p>").await;
    env.mount_page("/good", "<p>alpha</p>").await;

    let crawler = env.crawler(1);

    let conn = env.raw_connection();
    conn.execute_batch(
        "CREATE TRIGGER reject_beta BEFORE INSERT ON page_terms
         WHEN (SELECT term FROM terms WHERE term_id = NEW.term_id) = 'beta'
         BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
    )
    .unwrap();

    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert_eq!(report.outcomes.get(PathOutcome::IndexFailed), 1);
    assert_eq!(report.pages_indexed(), 2);
    assert!(!crawler.scraped().contains(&env.domain, "/bad"));

    {
        let storage = crawler.storage().lock();
        assert!(page_id(&storage, &env.domain, "/bad").is_none());
        assert_eq!(storage.find_term("alpha").unwrap().unwrap().document_frequency, 2);
        assert!(storage.find_term("beta").unwrap().is_none());
    }
    assert_document_frequencies_consistent(&conn);

    // Once the fault is gone the path can be indexed.
    conn.execute_batch("DROP TRIGGER reject_beta;").unwrap();
    let tally = crawler.crawl_path(&env.domain, "/bad", 1).await.unwrap();
    assert_eq!(tally.get(PathOutcome::Indexed), 1);

    let storage = crawler.storage().lock();
    assert_eq!(storage.find_term("alpha").unwrap().unwrap().document_frequency, 3);
    assert_eq!(storage.find_term("beta").unwrap().unwrap().document_frequency, 1);
}

#[tokio::test]
async fn test_unreachable_robots_aborts_domain() {
    let env = TestEnv::start().await;
    env.mount_page("/", "<p>home</p>").await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&env.server)
        .await;

    let crawler = env.crawler_with_timeout(1, 1);
    let report = crawler.crawl_domain(&env.domain).await.unwrap();

    assert!(matches!(
        report.abort,
        Some(AbortReason::RobotsUnavailable(_))
    ));
    assert_eq!(crawler.storage().lock().count_pages().unwrap(), 0);
}

#[tokio::test]
async fn test_batch_from_domain_list() {
    let env = TestEnv::start().await;
    env.mount_page("/", "<p>batch home</p>").await;

    let mut list = tempfile::NamedTempFile::new().unwrap();
    writeln!(list, "# domains to crawl").unwrap();
    writeln!(list, "  {}  ", env.domain).unwrap();
    writeln!(list).unwrap();
    writeln!(list, "bad domain").unwrap();
    writeln!(list, "127.0.0.1:9").unwrap();

    let domains = read_domain_list(list.path()).unwrap();
    assert_eq!(domains.len(), 3);

    let runner = BatchRunner::new(env.crawler(1));
    let batch = runner.run(&domains).await;

    assert_eq!(batch.domains_crawled(), 1);
    assert_eq!(batch.domains_aborted(), 1);
    assert_eq!(batch.skipped.len(), 1);
    assert_eq!(batch.pages_indexed(), 1);
}
