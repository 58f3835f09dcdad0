pub mod actor_scope;
pub mod cache;
pub mod company_ranker;
pub mod counter;
pub mod favorites;
pub mod job_ranker;
pub mod location_index;
pub mod location_search;
pub mod pipeline_count;
pub mod title_suggester;
