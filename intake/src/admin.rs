use std::fmt::Write;

use common::models::CustomerRecord;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Customer submissions</title>
<style>
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
th { background: #f3f3f3; }
a.delete { color: #b00020; }
</style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Renders the admin listing, one row per record in stored order.
pub fn render_panel(customers: &[CustomerRecord]) -> String {
    let mut page = String::from(PAGE_HEAD);

    // Writing into a String cannot fail.
    let _ = writeln!(
        page,
        "<h1>Customer submissions ({})</h1>\n<p><a href=\"/admin/export\">Export JSON</a></p>",
        customers.len()
    );

    if customers.is_empty() {
        page.push_str("<p>No submissions yet.</p>\n");
    } else {
        page.push_str(
            "<table>\n<tr><th>#</th><th>Name</th><th>Email</th><th>Country</th>\
             <th>Interests</th><th>Message</th><th>Submitted</th><th>IP</th><th></th></tr>\n",
        );
        for (index, customer) in customers.iter().enumerate() {
            let interests: Vec<String> = customer.interests.iter().map(|i| escape(i)).collect();
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{}</td>\
                 <td><a class=\"delete\" href=\"/admin/delete/{}\" \
                 onclick=\"return confirm('Delete this record?');\">Delete</a></td></tr>",
                index,
                escape(&customer.full_name),
                escape(&customer.email),
                escape(&customer.country),
                interests.join(", "),
                escape(&customer.message),
                customer.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
                escape(&customer.ip_address),
                index,
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str(PAGE_TAIL);
    page
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn customer(name: &str) -> CustomerRecord {
        CustomerRecord {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: "jane@x.com".to_string(),
            country: "US".to_string(),
            interests: vec!["history".to_string(), "food".to_string()],
            message: "hi".to_string(),
            submitted_at: Utc::now(),
            ip_address: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_empty_panel() {
        let page = render_panel(&[]);
        assert!(page.contains("Customer submissions (0)"));
        assert!(page.contains("No submissions yet."));
        assert!(!page.contains("<table>"));
    }

    #[test]
    fn test_rows_link_to_positional_delete() {
        let page = render_panel(&[customer("Jane Doe"), customer("John Roe")]);
        assert!(page.contains("Jane Doe"));
        assert!(page.contains("history, food"));
        assert!(page.contains("href=\"/admin/delete/0\""));
        assert!(page.contains("href=\"/admin/delete/1\""));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let page = render_panel(&[customer("<script>alert('x')</script>")]);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }
}
