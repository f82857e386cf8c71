use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;
use url::Url;

use crate::config::prefix_base;
use crate::model::{Author, Quote, Tag};
use crate::{Error, Result, QUOTES_PER_PAGE};

/// Parses the page on the blocking pool and extracts its quotes.
/// An empty `Vec` means the page is past the end of the data.
pub(crate) async fn parse_page(html: String, base_url: Url) -> Result<Vec<Quote>> {
    let quotes = spawn_blocking(move || extract_quotes(&html, &base_url)).await??;
    Ok(quotes)
}

/// Extracts every `.quote` container of the document, in document order.
/// Missing sub-fields become empty strings, relative links are resolved against `base_url`.
pub fn extract_quotes(html: &str, base_url: &Url) -> Result<Vec<Quote>> {
    let doc = Html::parse_document(html);

    // Create selectors.
    let quote_selector = create_selector(".quote")?;
    let text_selector = create_selector("span.text")?;
    let author_selector = create_selector("small.author")?;
    let author_link_selector = create_selector("span > a[href]")?;
    let tag_selector = create_selector("a.tag")?;

    let mut quotes = Vec::with_capacity(QUOTES_PER_PAGE);
    for quote_div in doc.select(&quote_selector) {
        let text = first_text(quote_div, &text_selector);
        let author = Author {
            name: first_text(quote_div, &author_selector),
            url: quote_div
                .select(&author_link_selector)
                .next()
                .map(|a| resolve_link(base_url, a))
                .unwrap_or_default(),
        };
        let tags = quote_div
            .select(&tag_selector)
            .map(|a| Tag {
                name: element_text(a),
                url: resolve_link(base_url, a),
            })
            .collect();

        quotes.push(Quote { text, author, tags });
    }
    Ok(quotes)
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

fn first_text(parent: ElementRef, selector: &Selector) -> String {
    parent
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

#[inline]
fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Absolute form of the element's `href`, empty if it has none.
/// Relative links get the base URL prefixed, base path included, the same way page URLs do.
fn resolve_link(base_url: &Url, el: ElementRef) -> String {
    let Some(href) = el.value().attr("href") else {
        return String::new();
    };
    match Url::parse(href) {
        Ok(url) => url.into(),
        Err(_) => prefix_base(base_url, href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div class="col-md-8">
            <div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
                <span class="text" itemprop="text">“The world as we have created it is a process of our thinking.”</span>
                <span>by <small class="author" itemprop="author">Albert Einstein</small>
                <a href="/author/Albert-Einstein">(about)</a>
                </span>
                <div class="tags">
                    Tags:
                    <meta class="keywords" itemprop="keywords" content="change,deep-thoughts" />
                    <a class="tag" href="/tag/change/page/1/">change</a>
                    <a class="tag" href="/tag/deep-thoughts/page/1/">deep-thoughts</a>
                </div>
            </div>
            <div class="quote" itemscope itemtype="http://schema.org/CreativeWork">
                <span class="text" itemprop="text">“A day without sunshine is like, you know, night.”</span>
                <span>by <small class="author" itemprop="author">Steve Martin</small>
                <a href="/author/Steve-Martin">(about)</a>
                </span>
                <div class="tags">
                    Tags:
                    <a class="tag" href="/tag/humor/page/1/">humor</a>
                </div>
            </div>
        </div>
        </body></html>
    "#;

    const PAST_THE_END: &str = r#"
        <html><body>
        <div class="col-md-8">
            No quotes found!
            <nav><ul class="pager"><li class="previous"><a href="/page/10/">Previous</a></li></ul></nav>
        </div>
        </body></html>
    "#;

    fn base() -> Url {
        Url::parse("https://quotes.toscrape.com").unwrap()
    }

    #[test]
    fn test_extract_quotes_from_page() {
        let quotes = extract_quotes(PAGE, &base()).unwrap();
        assert_eq!(quotes.len(), 2);

        let first = &quotes[0];
        assert_eq!(
            first.text,
            "“The world as we have created it is a process of our thinking.”"
        );
        assert_eq!(first.author.name, "Albert Einstein");
        assert_eq!(
            first.author.url,
            "https://quotes.toscrape.com/author/Albert-Einstein"
        );
        let tags: Vec<(&str, &str)> = first
            .tags
            .iter()
            .map(|t| (t.name.as_str(), t.url.as_str()))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("change", "https://quotes.toscrape.com/tag/change/page/1/"),
                (
                    "deep-thoughts",
                    "https://quotes.toscrape.com/tag/deep-thoughts/page/1/"
                ),
            ]
        );

        assert_eq!(quotes[1].author.name, "Steve Martin");
        assert_eq!(quotes[1].tags.len(), 1);
    }

    #[test]
    fn test_page_past_the_end_has_no_quotes() {
        let quotes = extract_quotes(PAST_THE_END, &base()).unwrap();
        assert!(quotes.is_empty());
        assert!(extract_quotes("", &base()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_fields_become_empty_strings() {
        let html = r#"
            <div class="quote">
                <span class="text">“Only the text survived.”</span>
                <a class="tag">orphan</a>
            </div>
        "#;
        let quotes = extract_quotes(html, &base()).unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].text, "“Only the text survived.”");
        assert_eq!(quotes[0].author.name, "");
        assert_eq!(quotes[0].author.url, "");
        assert_eq!(quotes[0].tags[0].name, "orphan");
        assert_eq!(quotes[0].tags[0].url, "");
    }

    #[test]
    fn test_absolute_links_are_kept() {
        let html = r#"
            <div class="quote">
                <span class="text">x</span>
                <span>by <small class="author">Someone</small>
                <a href="https://elsewhere.example/author/Someone">(about)</a></span>
            </div>
        "#;
        let quotes = extract_quotes(html, &base()).unwrap();
        assert_eq!(
            quotes[0].author.url,
            "https://elsewhere.example/author/Someone"
        );
    }

    #[test]
    fn test_relative_links_keep_the_base_path() {
        let base = Url::parse("http://host.test/quotes").unwrap();
        let quotes = extract_quotes(PAGE, &base).unwrap();
        assert_eq!(
            quotes[0].author.url,
            "http://host.test/quotes/author/Albert-Einstein"
        );
        assert_eq!(
            quotes[0].tags[0].url,
            "http://host.test/quotes/tag/change/page/1/"
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let first = extract_quotes(PAGE, &base()).unwrap();
        let second = extract_quotes(PAGE, &base()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_parse_page_runs_on_blocking_pool() {
        let quotes = parse_page(PAGE.to_string(), base()).await.unwrap();
        assert_eq!(quotes.len(), 2);
    }
}
