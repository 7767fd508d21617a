// Scripted extractor for processor and batch tests

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use super::errors::DownloadError;
use super::models::{DownloadSummary, PlaylistEntry, PlaylistInfo};
use super::options::ExtractionOptions;
use super::traits::PlaylistExtractor;

#[derive(Default)]
pub struct FakeExtractor {
    probes: Mutex<HashMap<String, VecDeque<Result<PlaylistInfo, DownloadError>>>>,
    downloads: Mutex<HashMap<String, VecDeque<Result<DownloadSummary, DownloadError>>>>,
    pub probe_calls: Mutex<Vec<String>>,
    /// (url, output template) per download call
    pub download_calls: Mutex<Vec<(String, PathBuf)>>,
}

pub fn playlist(title: &str, entries: usize) -> PlaylistInfo {
    PlaylistInfo {
        title: Some(title.to_string()),
        entries: Some(vec![Some(PlaylistEntry::default()); entries]),
    }
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a probe result for `url`; results are consumed in order.
    pub fn on_probe(self, url: &str, result: Result<PlaylistInfo, DownloadError>) -> Self {
        self.probes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn on_download(self, url: &str, result: Result<DownloadSummary, DownloadError>) -> Self {
        self.downloads
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn probe_count(&self, url: &str) -> usize {
        self.probe_calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn download_count(&self, url: &str) -> usize {
        self.download_calls.lock().unwrap().iter().filter(|(u, _)| u == url).count()
    }
}

#[async_trait]
impl PlaylistExtractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn probe(&self, url: &str) -> Result<PlaylistInfo, DownloadError> {
        self.probe_calls.lock().unwrap().push(url.to_string());
        let mut probes = self.probes.lock().unwrap();
        let queue = probes.entry(url.to_string()).or_default();
        // The last scripted result repeats once the queue runs dry
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        match queue.front() {
            Some(Ok(info)) => Ok(info.clone()),
            Some(Err(e)) => Err(DownloadError::Extraction(e.to_string())),
            None => Err(DownloadError::Extraction(format!("no probe scripted for {}", url))),
        }
    }

    async fn download(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<DownloadSummary, DownloadError> {
        self.download_calls
            .lock()
            .unwrap()
            .push((url.to_string(), options.output_template.clone()));
        self.downloads
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(DownloadSummary::default()))
    }
}
