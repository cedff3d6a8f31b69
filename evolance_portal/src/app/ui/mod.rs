mod auth_form;
mod composer;
mod dashboard;
mod feed;
mod header;
