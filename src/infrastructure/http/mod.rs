mod audio_fetcher;

pub use audio_fetcher::HttpAudioFetcher;
