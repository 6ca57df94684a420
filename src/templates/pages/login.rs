use crate::templates::components::{notice_banner, Notice};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct LoginVm {
    pub notice: Option<Notice>,
    /// Three strikes: the form disappears for the rest of the session.
    pub locked: bool,
}

pub fn login_page(vm: &LoginVm) -> Markup {
    desktop_layout(
        "Sign in",
        None,
        html! {
            main class="container narrow" {
                h1 { "🔒 Permit Dashboard Authentication" }

                @if let Some(notice) = &vm.notice {
                    (notice_banner(notice))
                }

                @if vm.locked {
                    (notice_banner(&Notice::new(
                        "error",
                        "Too many failed attempts. Please try again later.",
                    )))
                } @else {
                    section class="card" {
                        h3 { "Login to Dashboard" }
                        form action="/login" method="post" {
                            label class="field" {
                                span { "Username" }
                                input type="text" name="username" required;
                            }
                            label class="field" {
                                span { "Password" }
                                input type="password" name="password" required;
                            }
                            button type="submit" { "Login" }
                        }
                        p {
                            "No account yet? "
                            a href="/register" { "Register" }
                        }
                    }
                }
            }
        },
    )
}
