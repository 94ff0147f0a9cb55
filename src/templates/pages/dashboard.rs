use crate::domain::aggregate::MONTH_NAMES;
use crate::domain::{CanonicalStatus, DashboardView, LoadState};
use crate::templates::components::{card, stat_card};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn dashboard_page(vm: &DashboardView) -> Markup {
    desktop_layout(
        "Dashboard",
        html! {
            main class="container" {
                h1 { "Shipments · " (vm.month_name) " " (vm.year) }

                (load_notice(vm))
                (month_picker(vm))

                div class="cards" {
                    (stat_card("Total this month", vm.total_this_month))
                    @for status in CanonicalStatus::ALL {
                        (stat_card(status.label(), vm.counts.get(status)))
                    }
                }

                (recent_card(vm))

                div class="cards" {
                    (card("Complaints", html! {
                        p { "Open: " strong { (vm.complaints.open) } }
                        p { "Resolved: " strong { (vm.complaints.resolved) } }
                        @if vm.complaints.other > 0 {
                            p { "Other: " strong { (vm.complaints.other) } }
                        }
                    }))
                    (card("All time", html! {
                        table {
                            @for (status, count) in vm.all_time.iter() {
                                tr { td { (status.label()) } td { (count) } }
                            }
                        }
                    }))
                }
            }
        },
    )
}

fn load_notice(vm: &DashboardView) -> Markup {
    html! {
        @match vm.load_state {
            LoadState::Idle => p class="notice" { "No data loaded yet." },
            LoadState::Loading => p class="notice" { "Loading bookings…" },
            LoadState::Failed => p class="notice error" {
                "Could not load bookings; showing empty figures."
                @if let Some(err) = &vm.error {
                    " (" (err) ")"
                }
            },
            LoadState::Loaded => {},
        }
    }
}

fn month_picker(vm: &DashboardView) -> Markup {
    html! {
        div style="display: flex; gap: 10px; align-items: center; margin-bottom: 1rem;" {
            form action="/" method="get" style="display: flex; gap: 10px;" {
                label for="month" class="sr-only" { "Month" }
                select name="month" id="month" {
                    @for (idx, name) in MONTH_NAMES.iter().enumerate() {
                        option value=(idx) selected[idx as u32 == vm.month] { (name) }
                    }
                }
                button type="submit" { "Show" }
            }
            form action="/refresh" method="post" {
                button type="submit" { "Refresh" }
            }
        }
    }
}

fn recent_card(vm: &DashboardView) -> Markup {
    card(
        "Recent activity",
        html! {
            @if vm.recent.is_empty() {
                p { "No recent shipments." }
            } @else {
                table {
                    thead {
                        tr { th { "Booking" } th { "Destination" } th { "Status" } th { "Date" } }
                    }
                    tbody {
                        @for entry in &vm.recent {
                            tr data-id=(entry.id) {
                                td { (entry.label) }
                                td { (entry.destination) }
                                td { (entry.status_label) }
                                td { (entry.date) }
                            }
                        }
                    }
                }
            }
        },
    )
}
