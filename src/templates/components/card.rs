use maud::{html, Markup};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// A single headline number.
pub fn stat_card(label: &str, value: usize) -> Markup {
    html! {
        div class="card stat" {
            div class="label" { (label) }
            div class="value" { (value) }
        }
    }
}
