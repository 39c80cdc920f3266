//! Server-rendered HTML pages.

use html_escape::{encode_double_quoted_attribute, encode_text};
use shutter_core::domain::{Comment, FeedItem, HomeView, Post, User};
use shutter_shared::Flash;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 640px; margin: 0 auto; padding: 1rem; background: #fafafa; }
nav { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; }
.flash { padding: .6rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.flash-success { background: #e3f6e5; }
.flash-error { background: #fde2e1; }
.flash-info { background: #e4effd; }
.card { background: #fff; border: 1px solid #dbdbdb; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.strip { display: flex; gap: .75rem; flex-wrap: wrap; }
.muted { color: #8e8e8e; font-size: .85rem; }
form.inline { display: inline; }
textarea { width: 100%; }
"#;

fn layout(title: &str, user: Option<&str>, flash: Option<&Flash>, body: &str) -> String {
    let nav = match user {
        Some(name) => format!(
            r#"<span>@{}</span> <form class="inline" method="post" action="/logout"><button>Log out</button></form>"#,
            encode_text(name)
        ),
        None => r#"<a href="/login">Log in</a> · <a href="/register">Sign up</a>"#.to_string(),
    };

    let flash = flash
        .map(|f| {
            format!(
                r#"<div class="flash flash-{}">{}</div>"#,
                f.level,
                encode_text(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · Shutter</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/home"><strong>Shutter</strong></a><div>{nav}</div></nav>
{flash}
{body}
</body>
</html>"#,
        title = encode_text(title),
    )
}

pub fn login_page(flash: Option<&Flash>) -> String {
    let body = r#"<div class="card">
<h2>Log in</h2>
<form method="post" action="/login">
<p><input name="username" placeholder="Username" autocomplete="username"></p>
<p><input name="password" type="password" placeholder="Password" autocomplete="current-password"></p>
<p><button>Log in</button></p>
</form>
<p class="muted">No account? <a href="/register">Sign up</a></p>
</div>"#;
    layout("Log in", None, flash, body)
}

pub fn register_page(flash: Option<&Flash>) -> String {
    let body = r#"<div class="card">
<h2>Create an account</h2>
<form method="post" action="/register">
<p><input name="username" placeholder="Username" autocomplete="username"></p>
<p><input name="password" type="password" placeholder="Password" autocomplete="new-password"></p>
<p><input name="confirm_password" type="password" placeholder="Confirm password" autocomplete="new-password"></p>
<p><button>Sign up</button></p>
</form>
<p class="muted">Have an account? <a href="/login">Log in</a></p>
</div>"#;
    layout("Sign up", None, flash, body)
}

fn user_strip(title: &str, users: &[User], action: &str, button: &str) -> String {
    if users.is_empty() {
        return String::new();
    }

    let entries: String = users
        .iter()
        .map(|u| {
            format!(
                r#"<div>@{name} <form class="inline" method="post" action="/{action}/{id}"><button>{button}</button></form></div>"#,
                name = encode_text(&u.username),
                id = u.id,
            )
        })
        .collect();

    format!(
        r#"<div class="card"><h3>{}</h3><div class="strip">{entries}</div></div>"#,
        encode_text(title)
    )
}

fn feed_item(item: &FeedItem, viewer_id: i32) -> String {
    let post = &item.post;
    let owner_controls = if post.user_id == viewer_id {
        format!(
            r#" · <a href="/edit_post/{id}">Edit</a> <form class="inline" method="post" action="/delete_post/{id}"><button>Delete</button></form>"#,
            id = post.id
        )
    } else {
        String::new()
    };

    let comments: String = item
        .comments
        .iter()
        .map(|c| {
            let controls = if c.comment.user_id == viewer_id {
                format!(
                    r#" <a href="/edit_comment/{id}">Edit</a> <form class="inline" method="post" action="/delete_comment/{id}"><button>Delete</button></form>"#,
                    id = c.comment.id
                )
            } else {
                String::new()
            };
            format!(
                "<li><strong>{}</strong> {}{}</li>",
                encode_text(&c.author),
                encode_text(&c.comment.text),
                controls
            )
        })
        .collect();

    format!(
        r#"<article class="card" id="post-{id}">
<p><strong>@{author}</strong> <span class="muted">{when}</span>{owner_controls}</p>
<p>{caption}</p>
<form class="inline" method="post" action="/toggle_like/{id}"><button>{like_label}</button></form>
<span class="muted">{likes} like{plural}</span>
<ul>{comments}</ul>
<form method="post" action="/add_comment/{id}"><input name="text" placeholder="Add a comment..."> <button>Post</button></form>
</article>"#,
        id = post.id,
        author = encode_text(&item.author),
        when = post.timestamp.format("%Y-%m-%d %H:%M"),
        caption = encode_text(&post.caption),
        like_label = if item.liked { "Unlike" } else { "Like" },
        likes = item.like_count,
        plural = if item.like_count == 1 { "" } else { "s" },
    )
}

pub fn home_page(viewer_id: i32, viewer: &str, view: &HomeView, flash: Option<&Flash>) -> String {
    let composer = r#"<div class="card">
<form method="post" action="/create_post">
<textarea name="caption" rows="3" placeholder="Write a caption..."></textarea>
<p><button>Share</button></p>
</form>
</div>"#;

    let feed = if view.feed.is_empty() {
        r#"<p class="muted">Nothing here yet. Share something or follow someone.</p>"#.to_string()
    } else {
        view.feed
            .iter()
            .map(|item| feed_item(item, viewer_id))
            .collect()
    };

    let body = format!(
        "{}{}{}{}",
        user_strip("Following", &view.following, "unfollow", "Unfollow"),
        composer,
        feed,
        user_strip("Suggested for you", &view.suggestions, "follow", "Follow"),
    );

    layout("Home", Some(viewer), flash, &body)
}

pub fn edit_post_page(viewer: &str, post: &Post, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<div class="card">
<h2>Edit post</h2>
<form method="post" action="/edit_post/{id}">
<textarea name="caption" rows="4">{caption}</textarea>
<p><button>Save</button> <a href="/home#post-{id}">Cancel</a></p>
</form>
</div>"#,
        id = post.id,
        caption = encode_text(&post.caption),
    );
    layout("Edit post", Some(viewer), flash, &body)
}

pub fn edit_comment_page(viewer: &str, comment: &Comment, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"<div class="card">
<h2>Edit comment</h2>
<form method="post" action="/edit_comment/{id}">
<p><input name="text" value="{text}"></p>
<p><button>Save</button> <a href="/home#post-{post_id}">Cancel</a></p>
</form>
</div>"#,
        id = comment.id,
        post_id = comment.post_id,
        text = encode_double_quoted_attribute(&comment.text),
    );
    layout("Edit comment", Some(viewer), flash, &body)
}
