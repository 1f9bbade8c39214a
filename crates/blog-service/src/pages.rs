//! Inline HTML templates for the blog, signup, and welcome pages

use crate::storage::StoredPost;

/// Per-field validation messages carried back into the signup form
#[derive(Debug, Default)]
pub struct SignupErrors {
    pub username: Option<&'static str>,
    pub password: Option<&'static str>,
    pub verify: Option<&'static str>,
    pub email: Option<&'static str>,
}

impl SignupErrors {
    /// True when any field failed validation
    pub fn any(&self) -> bool {
        self.username.is_some()
            || self.password.is_some()
            || self.verify.is_some()
            || self.email.is_some()
    }
}

/// Front page listing the most recent posts
pub fn front_page(site_name: &str, posts: &[StoredPost]) -> String {
    let entries = if posts.is_empty() {
        r#"<p class="empty">No posts yet. <a href="/blog/newpost">Write the first one.</a></p>"#
            .to_string()
    } else {
        posts.iter().map(post_entry).collect::<Vec<_>>().join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1><a href="/blog">{title}</a></h1>
        {entries}
        <a href="/blog/newpost" class="button">New post</a>
    </div>
</body>
</html>"#,
        title = html_escape(site_name),
        css = CSS_STYLES,
        entries = entries,
    )
}

/// Permalink page for a single post
pub fn post_page(site_name: &str, post: &StoredPost) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{subject} - {title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1><a href="/blog">{title}</a></h1>
        {entry}
    </div>
</body>
</html>"#,
        subject = html_escape(&post.subject),
        title = html_escape(site_name),
        css = CSS_STYLES,
        entry = post_entry(post),
    )
}

/// New-post submission form, re-rendered with prior input on error
pub fn new_post_form(site_name: &str, subject: &str, content: &str, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!(r#"<div class="error">{}</div>"#, html_escape(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>New Post - {title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>New Post</h1>

        <form method="post" action="/blog/newpost">
            <div class="field">
                <label for="subject">Subject</label>
                <input type="text" id="subject" name="subject" value="{subject}">
            </div>
            <div class="field">
                <label for="content">Content</label>
                <textarea id="content" name="content" rows="10">{content}</textarea>
            </div>
            {error}
            <button type="submit">Publish</button>
        </form>
    </div>
</body>
</html>"#,
        title = html_escape(site_name),
        css = CSS_STYLES,
        subject = html_escape(subject),
        content = html_escape(content),
        error = error_html,
    )
}

/// Signup form, re-rendered with entered username/email on error.
/// Passwords are never echoed back.
pub fn signup_form(site_name: &str, username: &str, email: &str, errors: &SignupErrors) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Signup - {title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Signup</h1>

        <form method="post" action="/signup">
            <div class="field">
                <label for="username">Username</label>
                <input type="text" id="username" name="username" value="{username}">
                {username_error}
            </div>
            <div class="field">
                <label for="password">Password</label>
                <input type="password" id="password" name="password">
                {password_error}
            </div>
            <div class="field">
                <label for="verify">Verify Password</label>
                <input type="password" id="verify" name="verify">
                {verify_error}
            </div>
            <div class="field">
                <label for="email">Email (optional)</label>
                <input type="text" id="email" name="email" value="{email}">
                {email_error}
            </div>
            <button type="submit">Sign up</button>
        </form>
    </div>
</body>
</html>"#,
        title = html_escape(site_name),
        css = CSS_STYLES,
        username = html_escape(username),
        email = html_escape(email),
        username_error = field_error(errors.username),
        password_error = field_error(errors.password),
        verify_error = field_error(errors.verify),
        email_error = field_error(errors.email),
    )
}

/// Welcome page shown after a successful signup
pub fn welcome_page(site_name: &str, username: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Welcome - {title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Welcome, {username}!</h1>
        <p><a href="/blog">Head over to the blog.</a></p>
    </div>
</body>
</html>"#,
        title = html_escape(site_name),
        css = CSS_STYLES,
        username = html_escape(username),
    )
}

/// A single rendered post entry: subject heading, date, and content
fn post_entry(post: &StoredPost) -> String {
    format!(
        r#"<div class="post">
            <h2><a href="/blog/{id}">{subject}</a></h2>
            <div class="post-date">{date}</div>
            <div class="post-content">{content}</div>
        </div>"#,
        id = post.id,
        subject = html_escape(&post.subject),
        date = post.created.format("%Y-%m-%d"),
        content = render_content(&post.content),
    )
}

fn field_error(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<span class="field-error">{}</span>"#, html_escape(m)))
        .unwrap_or_default()
}

/// Escapes content and keeps blank lines visible as line breaks
fn render_content(content: &str) -> String {
    html_escape(content).replace('\n', "<br>")
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const CSS_STYLES: &str = r#"
* {
    box-sizing: border-box;
}
body {
    font-family: Georgia, "Times New Roman", serif;
    background: #faf8f3;
    color: #2b2b2b;
    margin: 0;
    padding: 20px;
}
.container {
    max-width: 640px;
    margin: 0 auto;
    padding: 20px 0;
}
h1 {
    font-size: 28px;
    margin: 0 0 24px 0;
}
h1 a {
    color: #2b2b2b;
    text-decoration: none;
}
h2 {
    font-size: 20px;
    margin: 0 0 4px 0;
}
h2 a {
    color: #1d4ed8;
    text-decoration: none;
}
h2 a:hover {
    text-decoration: underline;
}
.post {
    margin-bottom: 32px;
}
.post-date {
    color: #8a8378;
    font-size: 13px;
    margin-bottom: 8px;
}
.post-content {
    line-height: 1.6;
}
.empty {
    color: #8a8378;
}
.field {
    margin-bottom: 16px;
}
label {
    display: block;
    margin-bottom: 4px;
    font-size: 14px;
}
input, textarea {
    width: 100%;
    padding: 8px;
    border: 1px solid #cfc8ba;
    border-radius: 4px;
    background: #fff;
    font-family: inherit;
    font-size: 15px;
}
input:focus, textarea:focus {
    outline: none;
    border-color: #1d4ed8;
}
button, .button {
    display: inline-block;
    padding: 10px 18px;
    background: #1d4ed8;
    color: #fff;
    border: none;
    border-radius: 4px;
    font-size: 15px;
    cursor: pointer;
    text-decoration: none;
}
button:hover, .button:hover {
    background: #1e40af;
}
.error {
    margin: 12px 0;
    padding: 10px;
    border-radius: 4px;
    background: #fde8e8;
    color: #b91c1c;
    font-size: 14px;
}
.field-error {
    display: block;
    margin-top: 4px;
    color: #b91c1c;
    font-size: 13px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post(subject: &str, content: &str) -> StoredPost {
        let now = Utc::now();
        StoredPost {
            id: 1,
            subject: subject.to_string(),
            content: content.to_string(),
            created: now,
            last_modified: now,
        }
    }

    #[test]
    fn post_content_escapes_markup_and_keeps_line_breaks() {
        let post = sample_post("Title", "line one\nline <two> & 'three'");
        let html = post_page("Scribe", &post);

        assert!(html.contains("line one<br>line &lt;two&gt; &amp; &#x27;three&#x27;"));
    }

    #[test]
    fn form_errors_render_per_field() {
        let errors = SignupErrors {
            username: Some("That's not a valid username."),
            ..Default::default()
        };
        assert!(errors.any());

        let html = signup_form("Scribe", "a!", "", &errors);
        assert!(html.contains("That&#x27;s not a valid username."));
        assert!(html.contains(r#"value="a!""#));
    }

    #[test]
    fn empty_front_page_offers_the_form() {
        let html = front_page("Scribe", &[]);
        assert!(html.contains("No posts yet."));
    }
}
