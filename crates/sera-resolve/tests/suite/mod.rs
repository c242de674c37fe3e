mod concurrency;
mod config;
mod dispatch;
mod fixtures;
mod merge;
