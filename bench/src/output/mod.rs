pub mod time_series_log;
