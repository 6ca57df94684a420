use maud::{html, Markup};

/// One-shot message carried through a redirect's query string.
/// Kinds mirror the banner palette: success, error, warning, info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: &str, message: &str) -> Self {
        Notice {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }
}

pub fn notice_banner(notice: &Notice) -> Markup {
    let class = match notice.kind.as_str() {
        "success" => "banner banner-success",
        "warning" => "banner banner-warning",
        "info" => "banner banner-info",
        _ => "banner banner-error",
    };
    html! {
        div class=(class) { (notice.message) }
    }
}

/// Plain table of prerendered cells, with an optional emphasized last row.
pub fn data_table(headers: &[String], rows: &[Vec<String>], total: Option<&[String]>) -> Markup {
    html! {
        div style="overflow-x: auto;" {
            table class="data" {
                thead {
                    tr {
                        @for header in headers {
                            th { (header) }
                        }
                    }
                }
                tbody {
                    @for row in rows {
                        tr {
                            @for cell in row {
                                td { (cell) }
                            }
                        }
                    }
                    @if let Some(total) = total {
                        tr class="total" {
                            @for cell in total {
                                td { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}
