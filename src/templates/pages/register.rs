use crate::templates::components::{notice_banner, Notice};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct RegisterVm {
    pub notice: Option<Notice>,
}

pub fn register_page(vm: &RegisterVm) -> Markup {
    desktop_layout(
        "Register",
        None,
        html! {
            main class="container narrow" {
                h1 { "🔒 Permit Dashboard Authentication" }

                @if let Some(notice) = &vm.notice {
                    (notice_banner(notice))
                }

                section class="card" {
                    h3 { "Create New Account" }
                    form action="/register" method="post" {
                        label class="field" {
                            span { "Username" }
                            input type="text" name="username" required;
                        }
                        label class="field" {
                            span { "Full Name" }
                            input type="text" name="name";
                        }
                        label class="field" {
                            span { "Password" }
                            input type="password" name="password" required;
                        }
                        label class="field" {
                            span { "Confirm Password" }
                            input type="password" name="confirm_password" required;
                        }
                        button type="submit" { "Register" }
                    }
                    p {
                        "Already registered? "
                        a href="/login" { "Login" }
                    }
                }
            }
        },
    )
}
