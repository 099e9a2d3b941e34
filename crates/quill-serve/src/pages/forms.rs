//! Login, registration, and post editor forms.
//!
//! Each form takes previously-entered values so a validation failure
//! re-renders the form with the user's input intact. Passwords are never
//! echoed back.

use maud::{Markup, html};

use crate::auth::SessionUser;
use crate::pages::{notice, page_shell};

/// The login form. `next` is carried through so a successful login can
/// return to the page that required it.
pub fn login(
    site_name: &str,
    error: Option<&str>,
    username: &str,
    next: Option<&str>,
) -> Markup {
    let content = html! {
        div class="form-card" {
            h1 { "Log in" }
            @if let Some(message) = error { (notice(message)) }
            form method="post" action="/login" {
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next);
                }
                div class="field" {
                    label for="username" { "Username" }
                    input type="text" id="username" name="username"
                        value=(username) required autofocus;
                }
                div class="field" {
                    label for="password" { "Password" }
                    input type="password" id="password" name="password" required;
                }
                button class="primary" type="submit" { "Log in" }
            }
            p class="form-foot" {
                "No account yet? " a href="/register" { "Register" }
            }
        }
    };
    page_shell(site_name, "Log in", None, content)
}

/// The registration form.
pub fn register(site_name: &str, error: Option<&str>, username: &str, email: &str) -> Markup {
    let content = html! {
        div class="form-card" {
            h1 { "Register" }
            @if let Some(message) = error { (notice(message)) }
            form method="post" action="/register" {
                div class="field" {
                    label for="username" { "Username" }
                    input type="text" id="username" name="username"
                        value=(username) minlength="3" required autofocus;
                }
                div class="field" {
                    label for="email" { "Email" }
                    input type="email" id="email" name="email" value=(email) required;
                }
                div class="field" {
                    label for="password" { "Password" }
                    input type="password" id="password" name="password"
                        minlength="6" required;
                }
                button class="primary" type="submit" { "Create account" }
            }
            p class="form-foot" {
                "Already registered? " a href="/login" { "Log in" }
            }
        }
    };
    page_shell(site_name, "Register", None, content)
}

/// The post editor, shared between create and edit.
///
/// `action` is the URL the form posts back to ("/create" or "/edit/{id}").
pub fn post_editor(
    site_name: &str,
    user: &SessionUser,
    heading: &str,
    action: &str,
    error: Option<&str>,
    title: &str,
    content_md: &str,
) -> Markup {
    let content = html! {
        div class="form-card" {
            h1 { (heading) }
            @if let Some(message) = error { (notice(message)) }
            form method="post" action=(action) {
                div class="field" {
                    label for="title" { "Title" }
                    input type="text" id="title" name="title" value=(title)
                        required autofocus;
                }
                div class="field" {
                    label for="content" { "Content (Markdown)" }
                    textarea id="content" name="content" required { (content_md) }
                }
                button class="primary" type="submit" { "Publish" }
            }
        }
    };
    page_shell(site_name, heading, Some(user), content)
}
