pub mod dashboard_data;
