//! HTML templates for every page.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time
//! HTML generation with automatic escaping of dynamic values. Post bodies
//! are the single exception: they are embedded with `PreEscaped` after
//! passing `quill_core::render_markdown`, whose allow-list sanitizer makes
//! them safe.

pub mod forms;
pub mod home;
pub mod profile;

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::auth::SessionUser;

/// Inline CSS for all pages. Light theme in `:root`, dark theme either by
/// OS preference or the explicit `data-theme` set by the toggle script.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#fcfcfa;--fg:#1a1a1a;--fg2:#555;--fg3:#999;--accent:#2563eb;--accent-hover:#1d4ed8;--danger:#dc2626;--border:#e4e4e0;--surface:#fff;--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
:root[data-theme=dark]{--bg:#101014;--fg:#e6e6e6;--fg2:#a5a5a5;--fg3:#6b6b6b;--accent:#60a5fa;--accent-hover:#93c5fd;--danger:#f87171;--border:#26262c;--surface:#17171c}
@media(prefers-color-scheme:dark){:root:not([data-theme=light]){--bg:#101014;--fg:#e6e6e6;--fg2:#a5a5a5;--fg3:#6b6b6b;--accent:#60a5fa;--accent-hover:#93c5fd;--danger:#f87171;--border:#26262c;--surface:#17171c}}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;padding:1.5rem 1rem}
main{max-width:680px;width:100%;flex:1}
a{color:var(--accent);text-decoration:none}
a:hover{text-decoration:underline}
header.site{max-width:680px;width:100%;display:flex;align-items:center;gap:1rem;margin-bottom:2rem}
.site-title{font-size:1.3rem;font-weight:800;letter-spacing:-.02em;color:var(--fg)}
.site-title:hover{text-decoration:none;color:var(--accent)}
nav.site-nav{margin-left:auto;display:flex;align-items:center;gap:1rem;font-size:.92rem}
nav.site-nav .who{color:var(--fg3)}
.theme-btn{background:none;border:1px solid var(--border);border-radius:6px;color:var(--fg2);cursor:pointer;padding:.15rem .5rem;font-size:.9rem}
.theme-btn:hover{color:var(--accent);border-color:var(--accent)}

.card{padding:1.25rem 1.5rem;border:1px solid var(--border);border-radius:10px;background:var(--surface);margin-bottom:1rem}
.post-title{font-size:1.25rem;font-weight:700;letter-spacing:-.01em;margin-bottom:.25rem}
.post-meta{font-size:.82rem;color:var(--fg3);margin-bottom:.75rem}
.post-body{font-size:1rem;line-height:1.7;color:var(--fg)}
.post-body h1,.post-body h2,.post-body h3,.post-body h4{font-weight:700;margin:1.25rem 0 .5rem;letter-spacing:-.01em}
.post-body h1{font-size:1.3rem}
.post-body h2{font-size:1.15rem}
.post-body h3{font-size:1.05rem}
.post-body p{margin:.6rem 0}
.post-body ul,.post-body ol{margin:.6rem 0;padding-left:1.5rem}
.post-body blockquote{border-left:3px solid var(--border);padding:.4rem 0 .4rem 1rem;margin:.6rem 0;color:var(--fg2)}
.post-body pre{background:var(--bg);border:1px solid var(--border);border-radius:6px;padding:.65rem .9rem;overflow-x:auto;margin:.6rem 0;font-size:.85rem;line-height:1.5}
.post-body code{font-family:var(--mono);font-size:.88em;background:var(--bg);padding:.12rem .3rem;border-radius:3px;border:1px solid var(--border)}
.post-body pre code{background:none;border:none;padding:0;font-size:inherit}
.post-body hr{border:none;border-top:1px solid var(--border);margin:1.25rem 0}

.pager{display:flex;align-items:center;justify-content:space-between;margin:1.5rem 0;font-size:.92rem;color:var(--fg3)}
.pager .spacer{width:4rem}

.form-card{padding:1.5rem;border:1px solid var(--border);border-radius:10px;background:var(--surface)}
.form-card h1{font-size:1.3rem;font-weight:700;margin-bottom:1rem}
.field{margin-bottom:1rem}
.field label{display:block;font-size:.85rem;font-weight:600;color:var(--fg2);margin-bottom:.3rem}
.field input,.field textarea{width:100%;padding:.5rem .7rem;border:1px solid var(--border);border-radius:6px;background:var(--bg);color:var(--fg);font:inherit}
.field textarea{min-height:14rem;font-family:var(--mono);font-size:.9rem;line-height:1.5}
.field input:focus,.field textarea:focus{outline:2px solid var(--accent);outline-offset:-1px;border-color:transparent}
button.primary{background:var(--accent);color:#fff;border:none;border-radius:6px;padding:.5rem 1.1rem;font-size:.95rem;font-weight:600;cursor:pointer}
button.primary:hover{background:var(--accent-hover)}
button.danger{background:none;color:var(--danger);border:1px solid var(--danger);border-radius:6px;padding:.2rem .6rem;font-size:.82rem;cursor:pointer}
button.danger:hover{background:var(--danger);color:#fff}
.form-foot{margin-top:1rem;font-size:.88rem;color:var(--fg3)}

.notice{border:1px solid var(--danger);color:var(--danger);border-radius:6px;padding:.6rem .9rem;margin-bottom:1rem;font-size:.9rem}
.empty{color:var(--fg3);text-align:center;padding:2.5rem 0}

table.mine{width:100%;border-collapse:collapse;font-size:.92rem}
table.mine th,table.mine td{text-align:left;padding:.5rem .4rem;border-bottom:1px solid var(--border)}
table.mine th{font-size:.78rem;text-transform:uppercase;letter-spacing:.05em;color:var(--fg3)}
table.mine .row-actions{display:flex;gap:.6rem;align-items:center;justify-content:flex-end}

.footer{text-align:center;margin-top:1.5rem;padding-top:.75rem;font-size:.8rem;color:var(--fg3);width:100%;max-width:680px}
"#;

/// Theme toggle: apply the stored choice early (avoids a flash), flip and
/// persist on click.
const THEME_JS: &str = r#"
(function(){var t=localStorage.getItem('quill-theme');if(t)document.documentElement.dataset.theme=t;})();
function quillToggleTheme(){
  var root=document.documentElement;
  var dark=root.dataset.theme==='dark'||(!root.dataset.theme&&matchMedia('(prefers-color-scheme: dark)').matches);
  root.dataset.theme=dark?'light':'dark';
  localStorage.setItem('quill-theme',root.dataset.theme);
}
"#;

/// Inline CSS for standalone error pages.
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#fcfcfa;color:#1a1a1a;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#666;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#2563eb}
@media(prefers-color-scheme:dark){
body{background:#101014;color:#e6e6e6}
.error-page p{color:#a5a5a5}
.error-page a{color:#60a5fa}
}
"#;

/// Render the full page shell: head, header with nav, body content, footer.
pub fn page_shell(
    site_name: &str,
    title: &str,
    user: Option<&SessionUser>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " — " (site_name) }
                style { (PreEscaped(PAGE_CSS)) }
                script { (PreEscaped(THEME_JS)) }
            }
            body {
                header class="site" {
                    a class="site-title" href="/" { (site_name) }
                    nav class="site-nav" {
                        @if let Some(user) = user {
                            a href="/create" { "New post" }
                            a href="/profile" { "My posts" }
                            span class="who" { "@" (user.username) }
                            a href="/logout" { "Log out" }
                        } @else {
                            a href="/login" { "Log in" }
                            a href="/register" { "Register" }
                        }
                        button class="theme-btn" type="button" onclick="quillToggleTheme()"
                            title="Toggle theme" { "◐" }
                    }
                }
                main { (content) }
                footer class="footer" {
                    "Powered by " a href="https://github.com/quill-blog/quill" { "Quill" }
                }
            }
        }
    }
}

/// Standalone error page used by `AppError`'s response mapping.
pub fn error_page(title: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="robots" content="noindex";
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                main class="error-page" {
                    h1 { (title) }
                    p { (message) }
                    a href="/" { "Back to the feed" }
                }
            }
        }
    }
}

/// A red inline notice box, used for form validation messages.
pub fn notice(message: &str) -> Markup {
    html! {
        div class="notice" { (message) }
    }
}

/// Format a timestamp as "Mon DD, YYYY HH:MM UTC".
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d, %Y %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_shell_escapes_site_name() {
        let markup = page_shell("<b>Evil</b>", "Home", None, html! {});
        let out = markup.into_string();
        assert!(!out.contains("<b>Evil</b>"));
        assert!(out.contains("&lt;b&gt;Evil&lt;/b&gt;"));
    }

    #[test]
    fn page_shell_nav_reflects_login_state() {
        let anon = page_shell("Quill", "Home", None, html! {}).into_string();
        assert!(anon.contains("/login"));
        assert!(!anon.contains("/logout"));

        let user = SessionUser {
            id: 1,
            username: "alice".to_string(),
        };
        let logged_in = page_shell("Quill", "Home", Some(&user), html! {}).into_string();
        assert!(logged_in.contains("/logout"));
        assert!(logged_in.contains("@alice"));
        assert!(!logged_in.contains("/register"));
    }

    #[test]
    fn error_page_contains_title_and_message() {
        let out = error_page("Not Found", "post 9 is gone").into_string();
        assert!(out.contains("Not Found"));
        assert!(out.contains("post 9 is gone"));
    }

    #[test]
    fn notice_escapes_message() {
        let out = notice("<script>x</script>").into_string();
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn format_date_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        assert_eq!(format_date(&ts), "Jan 01, 2024 09:30 UTC");
    }
}
