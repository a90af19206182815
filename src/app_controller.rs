use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::FragmentFilter;
use crate::file_utils::{FileManager, FragmentDocument};
use crate::translation::{BatchTranslator, TranslationService, TranslationStats};

// @module: Application controller for the command line workflows

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Service built from the configuration
    service: TranslationService,
    // @field: Node selection rules
    filter: FragmentFilter,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = TranslationService::new(&config.translation)?;
        Ok(Self::with_service(config, service))
    }

    /// Create a controller around an existing service
    pub fn with_service(config: Config, service: TranslationService) -> Self {
        Self {
            config,
            service,
            filter: FragmentFilter::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the configured backend answers
    pub async fn check_connection(&self) -> Result<()> {
        self.service
            .test_connection()
            .await
            .with_context(|| format!("Cannot reach {}", self.config.translation.provider.display_name()))?;
        info!(
            "{} ({}) is reachable",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );
        Ok(())
    }

    /// Translate one string with the labeled single-item contract
    pub async fn translate_text(&self, text: &str) -> Result<String> {
        Ok(self.service.translate_text(text, &self.config.target_language).await?)
    }

    /// Translate the selected items of a document in place
    pub async fn translate_document(
        &self,
        document: &mut FragmentDocument,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<TranslationStats> {
        let indices = document.select(&self.filter);
        if indices.is_empty() {
            warn!("Nothing to translate");
            return Ok(TranslationStats::new());
        }
        info!("Selected {} of {} items for translation", indices.len(), document.len());

        let originals = document.originals(&indices);
        let (translations, stats) = BatchTranslator::new(self.service.clone())
            .translate_fragments(&originals, &self.config.target_language, progress_callback)
            .await?;

        document.splice(&indices, &translations)?;
        Ok(stats)
    }

    /// Run the translate workflow on an input file and return the output path
    pub async fn run(&self, input_file: &Path, output_file: Option<PathBuf>) -> Result<PathBuf> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_file = output_file
            .unwrap_or_else(|| FileManager::generate_output_path(input_file, &self.config.target_language));
        let mut document = FragmentDocument::load(input_file)?;

        let batch_size = self.service.options.batch_size.max(1);
        let total_batches = document.select(&self.filter).len().div_ceil(batch_size) as u64;
        let progress_bar = ProgressBar::new(total_batches);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        info!(
            "🚀 PageBabel: {} - {} into {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.target_language
        );
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let result = self
            .translate_document(&mut document, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let stats = result?;

        FileManager::write_to_file(&output_file, &document.render()?)?;

        info!("{}", stats.summary());
        if stats.fallbacks > 0 {
            warn!("{} item(s) were kept in their original language", stats.fallbacks);
        }
        info!("Success: {:?}", output_file);

        Ok(output_file)
    }
}
