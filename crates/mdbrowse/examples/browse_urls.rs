//! Example: Browse a handful of live URLs and summarize the documents
//!
//! Run with: cargo run -p mdbrowse --example browse_urls

use mdbrowse::{browse, BrowseRequest, PageContent};

struct Case {
    url: &'static str,
    description: &'static str,
    expect_markdown: bool,
    expect_contains: &'static str,
}

const CASES: &[Case] = &[
    Case {
        url: "https://example.com",
        description: "Simple HTML page",
        expect_markdown: false,
        expect_contains: "Example Domain",
    },
    Case {
        url: "https://httpbin.org/html",
        description: "HTML article",
        expect_markdown: false,
        expect_contains: "Herman Melville",
    },
    Case {
        url: "https://raw.githubusercontent.com/rust-lang/rust/master/README.md",
        description: "Plain-text Markdown file",
        expect_markdown: true,
        expect_contains: "Rust",
    },
    Case {
        url: "https://www.rust-lang.org/sitemap.xml",
        description: "XML sitemap",
        expect_markdown: true,
        expect_contains: "# Sitemap",
    },
];

#[tokio::main]
async fn main() {
    println!("mdbrowse URL Examples");
    println!("=====================\n");

    let mut passed = 0;
    let mut failed = 0;

    for (i, case) in CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        let page = browse(BrowseRequest::new(case.url)).await;
        print_summary(&page);

        if check(case, &page) {
            println!("   ✓ PASS\n");
            passed += 1;
        } else {
            println!("   ✗ FAIL\n");
            failed += 1;
        }
    }

    println!("=====================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_summary(page: &PageContent) {
    println!("   Title: {}", page.title);
    println!("   Final URL: {}", page.url);
    println!("   Was Markdown: {}", page.was_markdown);

    let preview = page.markdown.chars().take(100).collect::<String>();
    println!(
        "   Preview: {}{}",
        preview.replace('\n', " "),
        if page.markdown.len() > 100 { "..." } else { "" }
    );

    if let Some(ref error) = page.error {
        println!("   Error: {}", error);
    }
}

fn check(case: &Case, page: &PageContent) -> bool {
    if page.is_error() {
        return false;
    }

    if page.was_markdown != case.expect_markdown {
        println!(
            "   Expected wasMarkdown={}, got {}",
            case.expect_markdown, page.was_markdown
        );
        return false;
    }

    if !page.markdown.contains(case.expect_contains) {
        println!("   Expected content to contain '{}'", case.expect_contains);
        return false;
    }

    true
}
