//! HTML rendering of the gallery

use std::fmt::Write;

use crate::{gallery::GalleryPage, image_storage::encode_key};

/// Escapes text for use in HTML content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Path of the delete action for an object key
#[must_use]
pub fn delete_action(key: &str) -> String {
    format!("/delete/{}", encode_key(key))
}

/// Renders a full gallery page
#[must_use]
pub fn render_gallery(page: &GalleryPage) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Image Gallery</title>\n\
         <style>\n\
         body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; }\n\
         .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }\n\
         .card img { width: 100%; height: 200px; object-fit: cover; }\n\
         .error { color: #b00020; }\n\
         </style>\n</head>\n<body>\n<h1>Image Gallery</h1>\n",
    );

    html.push_str(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"image\" accept=\"image/*\" required>\n\
         <button type=\"submit\">Upload</button>\n</form>\n",
    );

    if let Some(error) = &page.error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }

    if page.items.is_empty() {
        html.push_str("<p>No images yet.</p>\n");
    } else {
        html.push_str("<div class=\"grid\">\n");
        for image in &page.items {
            let name = escape_html(&image.display_name);
            let _ = write!(
                html,
                "<div class=\"card\">\n\
                 <img src=\"{url}\" alt=\"{name}\" loading=\"lazy\">\n\
                 <p>{name}</p>\n\
                 <form action=\"{action}\" method=\"post\">\
                 <button type=\"submit\">Delete</button></form>\n\
                 </div>\n",
                url = escape_html(&image.url),
                action = escape_html(&delete_action(&image.key)),
            );
        }
        html.push_str("</div>\n");
    }

    render_pagination(&mut html, page.current_page, page.total_pages);

    html.push_str("</body>\n</html>\n");
    html
}

fn render_pagination(html: &mut String, current_page: usize, total_pages: usize) {
    html.push_str("<nav class=\"pagination\">\n");

    if current_page > 1 {
        let _ = writeln!(html, "<a href=\"/?page={}\">Previous</a>", current_page - 1);
    }

    let _ = writeln!(html, "<span>Page {current_page} of {total_pages}</span>");

    if current_page < total_pages {
        let _ = writeln!(html, "<a href=\"/?page={}\">Next</a>", current_page + 1);
    }

    html.push_str("</nav>\n");
}
