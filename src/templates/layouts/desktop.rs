use maud::{html, Markup, DOCTYPE};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
main.container { max-width: 1080px; margin: 2rem auto; padding: 0 1rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 1rem; }
.card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.stat .value { font-size: 1.8rem; font-weight: 600; }
.notice { padding: 0.75rem 1rem; border-radius: 6px; background: #fef3c7; }
.notice.error { background: #fee2e2; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #f3f4f6; }
"#;

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Courier Dashboard" }
                style { (maud::PreEscaped(STYLES)) }
            }
            body {
                header {
                    h3 { "Courier Dashboard" }
                    nav {
                        a href="/" { "Shipments" }
                        " · "
                        a href="/api/summary" { "JSON" }
                    }
                }
                (content)
            }
        }
    }
}
