use super::ViewRenderer;
use crate::model::book::Book;
use std::fmt::Write;

const STYLESHEET_HREF: &str = "/css/style.css";

/// Plain HTML renderer with a shared page shell.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn page(&self, title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<link rel=\"stylesheet\" href=\"{STYLESHEET_HREF}\">\n\
             </head>\n<body>\n<nav><a href=\"/\">Home</a> <a href=\"/books\">Books</a> \
             <a href=\"/authors\">Authors</a> <a href=\"/years\">Years</a> \
             <a href=\"/search\">Search</a></nav>\n{body}</body>\n</html>\n",
            title = escape_html(title),
        )
    }
}

impl ViewRenderer for HtmlRenderer {
    fn render_index(&self) -> String {
        self.page(
            "Bookshelf",
            "<h1>Bookshelf</h1>\n<p>Browse the catalog by book, author or year.</p>\n",
        )
    }

    fn render_table(&self, books: &[Book]) -> String {
        let mut body = String::from(
            "<h1>Books</h1>\n<table>\n<thead><tr><th>ID</th><th>Title</th><th>Author</th>\
             <th>Edition</th><th>Pages</th><th>Year</th></tr></thead>\n<tbody>\n",
        );
        for book in books {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&book.id),
                escape_html(&book.title),
                escape_html(&book.author),
                escape_html(book.edition.as_deref().unwrap_or_default()),
                escape_html(book.pages.as_deref().unwrap_or_default()),
                escape_html(book.year.as_deref().unwrap_or_default()),
            );
        }
        body.push_str("</tbody>\n</table>\n");
        self.page("Books", &body)
    }

    fn render_list(&self, heading: &str, items: &[String]) -> String {
        let mut body = format!("<h1>{}</h1>\n<ul>\n", escape_html(heading));
        for item in items {
            let _ = writeln!(body, "<li>{}</li>", escape_html(item));
        }
        body.push_str("</ul>\n");
        self.page(heading, &body)
    }

    fn render_search(&self) -> String {
        self.page(
            "Search",
            "<h1>Search</h1>\n<form action=\"/books\" method=\"get\">\n\
             <input type=\"search\" name=\"q\" placeholder=\"Title, author or year\">\n\
             <button type=\"submit\">Search</button>\n</form>\n",
        )
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_html, HtmlRenderer};
    use crate::model::book::Book;
    use crate::render::ViewRenderer;

    #[test]
    fn escape_html_replaces_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn render_table_emits_one_row_per_book() {
        let books = vec![
            Book::new("1", "Dune", "Herbert").with_year("1965"),
            Book::new("2", "<Emma>", "Austen"),
        ];
        let html = HtmlRenderer::new().render_table(&books);

        assert_eq!(html.matches("<tr><td>").count(), 2);
        assert!(html.contains("<td>Dune</td>"));
        assert!(html.contains("&lt;Emma&gt;"));
        assert!(!html.contains("<Emma>"));
    }

    #[test]
    fn render_list_escapes_items() {
        let html = HtmlRenderer::new().render_list("Authors", &["A & B".to_string()]);
        assert!(html.contains("<li>A &amp; B</li>"));
    }
}
