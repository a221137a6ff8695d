pub mod icon_search;
pub mod pages;
pub mod shortcuts_api;
