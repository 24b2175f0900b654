use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use async_trait::async_trait;
use blogmirror::config::{ErrorPolicy, Layout, Pagination};
use blogmirror::{process_site, Config, Error, Fetch, Result};
use flate2::read::GzDecoder;

/// A tiny blog served from memory.
struct FixtureBlog(HashMap<String, String>);

#[async_trait]
impl Fetch for FixtureBlog {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.0.get(url).cloned().ok_or_else(|| Error::Http {
            url: url.to_string(),
            status: 404,
        })
    }
}

const ROOT: &str = "http://blog.example/home/loadArticoli";

fn preview(slug: &str, title: &str, date: &str) -> String {
    format!(
        r#"<article class="articoli-item">
            <meta itemprop="author" content="Il Pedante">
            <meta itemprop="datePublished" content="{date}">
            <h1 class="titolo"><a href="http://blog.example/{slug}">{title}</a></h1>
        </article>"#
    )
}

fn post(body: &str) -> String {
    format!(
        r#"<html><body><nav>Menu</nav>
            <div itemprop="articleBody">{body}<div class="share">Condividi</div></div>
        </body></html>"#
    )
}

fn fixture_blog() -> FixtureBlog {
    let pages = [
        (
            format!("{ROOT}/1"),
            format!(
                "<html><body>{}{}</body></html>",
                preview("uno", "Uno", "2020-01-12"),
                preview("due", "Due", "2020-01-05T09:15:00+01:00")
            ),
        ),
        (
            format!("{ROOT}/2"),
            format!("<html><body>{}</body></html>", preview("tre", "Tre", "2019-12-30")),
        ),
        (
            "http://blog.example/uno".to_string(),
            post("<p>Il <em>primo</em> post.</p>"),
        ),
        (
            "http://blog.example/due".to_string(),
            post("<h2>Secondo</h2><p>Testo.</p>"),
        ),
        (
            "http://blog.example/tre".to_string(),
            post("<ul><li>uno</li><li>due</li></ul>"),
        ),
    ];
    FixtureBlog(pages.into_iter().collect())
}

fn read_rows(path: &std::path::Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut text = String::new();
    GzDecoder::new(File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (headers, rows)
}

#[tokio::test]
async fn mirrors_the_whole_blog() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        root_url: ROOT.into(),
        output: dir.path().join("_posts/posts.csv.gz"),
        ..Config::default()
    };

    let summary = process_site(&config, &fixture_blog()).await.unwrap();
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.posts, 3);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.output.as_deref(), Some(config.output.as_path()));

    let (headers, rows) = read_rows(&config.output);
    assert_eq!(
        headers,
        vec!["url", "title", "author", "date", "post", "post_markdown"]
    );
    assert_eq!(rows.len(), 3);

    let markdown = headers.iter().position(|h| h == "post_markdown").unwrap();
    for row in &rows {
        assert!(!row[markdown].trim().is_empty());
        assert!(!row[markdown].contains("Condividi"));
        assert!(!row[markdown].contains("Menu"));
    }

    let urls = rows.iter().map(|r| r[0].to_string()).collect::<Vec<_>>();
    assert_eq!(
        urls,
        [
            "http://blog.example/uno",
            "http://blog.example/due",
            "http://blog.example/tre"
        ]
    );
    assert_eq!(&rows[0][3], "2020-01-12");
    assert_eq!(&rows[1][3], "2020-01-05 09:15:00+01:00");
    assert!(rows[0][markdown].contains("primo"));
}

#[tokio::test]
async fn failed_post_discards_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut blog = fixture_blog();
    blog.0.remove("http://blog.example/due");
    let config = Config {
        root_url: ROOT.into(),
        output: dir.path().join("posts.csv.gz"),
        on_error: ErrorPolicy::Abort,
        ..Config::default()
    };

    let err = process_site(&config, &blog).await.unwrap_err();
    assert!(err.is_network());
    assert!(!config.output.exists());
}

#[tokio::test]
async fn failed_post_is_skipped_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut blog = fixture_blog();
    blog.0.insert(
        "http://blog.example/due".into(),
        "<html><body><p>Errore 500</p></body></html>".into(),
    );
    let config = Config {
        root_url: ROOT.into(),
        output: dir.path().join("posts.csv.gz"),
        on_error: ErrorPolicy::Skip,
        ..Config::default()
    };

    let summary = process_site(&config, &blog).await.unwrap();
    assert_eq!(summary.posts, 2);
    assert_eq!(summary.skipped, 1);

    let (_, rows) = read_rows(&config.output);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| &r[0] != "http://blog.example/due"));
}

#[tokio::test]
async fn mirrors_a_next_link_blog() {
    let page_one = r#"<html><body>
        <div class="post-preview">
            <a href="/2020/01/primo.html"><h2 class="post-title">Primo</h2>
            <h3 class="post-subtitle">Sottotitolo</h3></a>
            <p class="post-meta">12 January, 2020 | 3 commenti | ●●●</p>
        </div>
        <ul class="pager"><li class="next"><a href="/page/2/">Older Posts</a></li></ul>
    </body></html>"#;
    let page_two = r#"<html><body>
        <div class="post-preview">
            <a href="/2019/12/secondo.html"><h2 class="post-title">Secondo</h2></a>
            <p class="post-meta">30 dicembre, 2019 | Nessun commento | ●</p>
        </div>
    </body></html>"#;
    let blog = FixtureBlog(
        [
            ("https://blog.example/", page_one.to_string()),
            ("https://blog.example/page/2/", page_two.to_string()),
            ("https://blog.example/2020/01/primo.html", post("<p>Uno</p>")),
            ("https://blog.example/2019/12/secondo.html", post("<p>Due</p>")),
        ]
        .into_iter()
        .map(|(url, html)| (url.to_string(), html))
        .collect(),
    );

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        root_url: "https://blog.example/".into(),
        pagination: Pagination::NextLink,
        layout: Layout::Previews,
        output: dir.path().join("posts.csv.gz"),
        ..Config::default()
    };

    let summary = process_site(&config, &blog).await.unwrap();
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.posts, 2);

    let (headers, rows) = read_rows(&config.output);
    assert_eq!(
        headers,
        vec![
            "url",
            "title",
            "date",
            "subtitle",
            "comments",
            "rating",
            "post",
            "post_markdown"
        ]
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][3], "Sottotitolo");
    assert_eq!(&rows[0][4], "3");
    assert_eq!(&rows[0][5], "3");
    assert_eq!(&rows[1][2], "2019-12-30");
    assert_eq!(&rows[1][3], "");
    assert_eq!(&rows[1][4], "0");
    assert_eq!(&rows[1][5], "1");
}
