pub mod aggregate;
pub mod image_fetcher;
pub mod prompts;
pub mod providers;

pub use aggregate::{collect_text, finalize_hints, EMPTY_HINTS_FALLBACK};
pub use image_fetcher::{HttpImageFetcher, ImageFetchError, ImageFetcher, StaticImageFetcher};
pub use prompts::ArtworkMeta;
