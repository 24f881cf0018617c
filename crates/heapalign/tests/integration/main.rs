mod check;
mod exclude;
mod helpers;
mod output_format;
mod toml;
