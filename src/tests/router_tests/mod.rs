mod api_tests;
mod dashboard_tests;
