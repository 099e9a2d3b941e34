//! Home feed: paginated post cards, newest first.

use maud::{Markup, PreEscaped, html};

use quill_core::Post;

use crate::auth::SessionUser;
use crate::pages::{format_date, page_shell};
use crate::store::FeedPage;

/// Render one page of the feed.
pub fn feed(site_name: &str, user: Option<&SessionUser>, page: &FeedPage) -> Markup {
    let content = html! {
        @if page.posts.is_empty() {
            p class="empty" {
                @if page.page > 1 {
                    "Nothing on this page. " a href="/" { "Back to the start" } "."
                } @else {
                    "No posts yet. "
                    @if user.is_some() {
                        a href="/create" { "Write the first one" } "."
                    } @else {
                        a href="/register" { "Register" } " and write the first one."
                    }
                }
            }
        }
        @for post in &page.posts {
            (post_card(post))
        }
        @if page.total_pages > 1 {
            (pager(page))
        }
    };
    page_shell(site_name, "Home", user, content)
}

fn post_card(post: &Post) -> Markup {
    html! {
        article class="card" {
            h2 class="post-title" { (post.title) }
            p class="post-meta" {
                "by " (post.author) " on " (format_date(&post.created_at))
                @if post.updated_at != post.created_at {
                    " (updated " (format_date(&post.updated_at)) ")"
                }
            }
            // Rendered through the allow-list sanitizer at write time.
            div class="post-body" { (PreEscaped(&post.content_html)) }
        }
    }
}

fn pager(page: &FeedPage) -> Markup {
    html! {
        nav class="pager" {
            @if page.page > 1 {
                a href=(page_href(page.page - 1)) { "← Newer" }
            } @else {
                span class="spacer" {}
            }
            span { "Page " (page.page) " of " (page.total_pages) }
            @if page.page < page.total_pages {
                a href=(page_href(page.page + 1)) { "Older →" }
            } @else {
                span class="spacer" {}
            }
        }
    }
}

fn page_href(page: u32) -> String {
    if page <= 1 {
        "/".to_string()
    } else {
        format!("/page/{page}")
    }
}
