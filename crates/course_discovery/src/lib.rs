//! Client-side course discovery for an online-learning marketplace.
//!
//! The backend returns the whole catalog in one response; searching,
//! filtering, sorting and paging all happen here. See [`discovery::CourseDiscoveryState`]
//! for the view model and [`discovery::DiscoveryController`] for loading.

pub mod discovery;
