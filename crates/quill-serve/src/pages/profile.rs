//! Profile page: the logged-in author's posts with edit/delete controls.

use maud::{Markup, html};

use quill_core::PostSummary;

use crate::auth::SessionUser;
use crate::pages::{format_date, page_shell};

pub fn profile(site_name: &str, user: &SessionUser, posts: &[PostSummary]) -> Markup {
    let content = html! {
        div class="card" {
            h1 class="post-title" { "@" (user.username) }
            p class="post-meta" {
                (posts.len()) @if posts.len() == 1 { " post" } @else { " posts" }
            }
            @if posts.is_empty() {
                p class="empty" {
                    "You have not written anything yet. "
                    a href="/create" { "Start a post" } "."
                }
            } @else {
                table class="mine" {
                    thead {
                        tr {
                            th { "Title" }
                            th { "Published" }
                            th {}
                        }
                    }
                    tbody {
                        @for post in posts {
                            tr {
                                td { (post.title) }
                                td { (format_date(&post.created_at)) }
                                td {
                                    div class="row-actions" {
                                        a href={ "/edit/" (post.id) } { "Edit" }
                                        form method="post" action={ "/delete/" (post.id) } {
                                            button class="danger" type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    page_shell(site_name, "My posts", Some(user), content)
}
