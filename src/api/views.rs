use axum::response::Html;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let flash = flash
        .filter(|msg| !msg.is_empty())
        .map(|msg| format!(r#"<p class="flash error">{}</p>"#, escape_html(msg)))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 3rem auto; }}
.flash.error {{ color: #b00020; }}
</style>
</head>
<body>
<h1>{title}</h1>
{flash}
{body}
</body>
</html>
"#,
        title = escape_html(title),
        flash = flash,
        body = body,
    ))
}

fn upload_form(accept: &str, label: &str) -> String {
    format!(
        r#"<form method="post" enctype="multipart/form-data">
<input type="file" name="file" accept="{accept}">
<button type="submit">{label}</button>
</form>"#,
        accept = escape_html(accept),
        label = escape_html(label),
    )
}

pub fn render_home() -> Html<String> {
    layout(
        "Paired Upload",
        None,
        r#"<p>Upload a CSV file, then the PDF that belongs with it.</p>
<p><a href="/upload_csv">Start a new upload</a></p>"#,
    )
}

pub fn render_upload_csv(flash: Option<&str>) -> Html<String> {
    layout("Upload CSV", flash, &upload_form(".csv", "Upload CSV"))
}

pub fn render_upload_pdf(filename: &str, flash: Option<&str>) -> Html<String> {
    let body = format!(
        "<p>Now upload the PDF for <strong>{}</strong>.</p>\n{}",
        escape_html(filename),
        upload_form(".pdf", "Upload PDF"),
    );
    layout("Upload PDF", flash, &body)
}

pub fn render_uploaded(filename: &str) -> Html<String> {
    let filename = escape_html(filename);
    let body = format!(
        r#"<p>Both files for <strong>{filename}</strong> were uploaded.</p>
<ul>
<li>{filename}.csv</li>
<li>{filename}.pdf</li>
</ul>
<p><a href="/upload_csv">Upload another pair</a></p>"#
    );
    layout("Upload complete", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_flash_is_rendered_escaped() {
        let Html(page) = render_upload_csv(Some("<b>No file part</b>"));
        assert!(page.contains(r#"<p class="flash error">&lt;b&gt;No file part&lt;/b&gt;</p>"#));
    }

    #[test]
    fn test_empty_flash_is_omitted() {
        let Html(page) = render_upload_csv(Some(""));
        assert!(!page.contains("flash error"));
        assert!(page.contains(r#"name="file""#));
    }

    #[test]
    fn test_pdf_and_completion_pages_name_the_pair() {
        let Html(page) = render_upload_pdf("report", None);
        assert!(page.contains("<strong>report</strong>"));
        assert!(page.contains(r#"accept=".pdf""#));

        let Html(page) = render_uploaded("report");
        assert!(page.contains("report.csv"));
        assert!(page.contains("report.pdf"));
    }
}
