use crate::users::Role;
use maud::{html, Markup, PreEscaped, DOCTYPE};

/// Who the header shows as signed in.
pub struct LayoutUser<'a> {
    pub username: &'a str,
    pub role: Role,
}

// Everything is served inline; there is no static file route.
const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f5f7fa; color: #111827; }
.topbar { display: flex; align-items: center; justify-content: space-between;
          padding: 0.75rem 1.5rem; background: #ffffff; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.topbar h3 { margin: 0; }
.user-info { display: flex; align-items: center; gap: 12px; font-size: 0.95em; color: #374151; }
.user-info form { margin: 0; }
.container { max-width: 1100px; margin: 1.5rem auto; padding: 0 1rem; }
.container.narrow { max-width: 480px; }
.card { background: #ffffff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1.5rem;
        box-shadow: 0 1px 2px rgba(0,0,0,0.08); }
.card h3 { margin-top: 0; }
.banner { padding: 10px 14px; border-radius: 6px; margin: 0.75rem 0; }
.banner-success { background: #d1fae5; color: #065f46; }
.banner-error { background: #fee2e2; color: #991b1b; }
.banner-warning { background: #fef3c7; color: #92400e; }
.banner-info { background: #dbeafe; color: #1e40af; }
table.data { width: 100%; border-collapse: collapse; margin-top: 0.75rem; }
table.data th { padding: 10px 8px; border-bottom: 2px solid #e5e7eb; text-align: left; }
table.data td { padding: 8px; border-bottom: 1px solid #f3f4f6; }
table.data tr.total td { font-weight: bold; border-top: 2px solid #e5e7eb; }
label.field { display: block; margin-bottom: 0.75rem; }
label.field span { display: block; font-size: 0.9em; color: #374151; margin-bottom: 2px; }
input[type=text], input[type=password], input[type=date], select {
    padding: 8px; border: 1px solid #ccc; border-radius: 4px; font-size: 15px; }
button { padding: 8px 16px; background: #3b82f6; color: white; border: none;
         border-radius: 4px; cursor: pointer; font-size: 15px; }
button.quiet { background: #6b7280; }
.chart svg { max-width: 100%; height: auto; }
details { margin: 0.75rem 0; }
details summary { cursor: pointer; font-weight: 500; }
"#;

pub fn desktop_layout(title: &str, user: Option<LayoutUser<'_>>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header class="topbar" {
                    h3 { "📋 Permit Analysis Dashboard" }
                    @if let Some(user) = &user {
                        div class="user-info" {
                            span {
                                "Logged in as: " strong { (user.username) }
                                " | Role: " strong { (user.role.label()) }
                            }
                            form action="/logout" method="post" {
                                button type="submit" class="quiet" { "🚪 Logout" }
                            }
                        }
                    }
                }
                (content)
            }
        }
    }
}
