//! Training-batch collation and label masking for supervised fine-tuning
//! of multimodal chat models.
//!
//! A batch is model-ready when labels mirror the input ids except at
//! positions the loss must skip. Wrong masking corrupts training silently,
//! so the masked categories are an explicit map and collaborator output is
//! validated against the batch shape.

use thiserror::Error;

use crate::prompt::ChatMessage;
use crate::prompt::ImageHandle;

/// Label value the loss function ignores.
pub const IGNORE_INDEX: i64 = -100;

#[derive(Debug, Error)]
pub enum CollateError {
    #[error("cannot collate an empty batch")]
    EmptyBatch,

    #[error("chat template rendering failed: {0}")]
    Template(String),

    #[error("processor failed: {0}")]
    Processor(String),

    #[error("processor returned {actual} rows for {expected} examples")]
    RowCountMismatch { expected: usize, actual: usize },
}

/// Token categories excluded from the loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Padding,
    ImagePlaceholder,
    AudioPlaceholder,
    ImageBoundary,
}

/// Explicit map from token category to the tokenizer's id for it.
///
/// Populated once from the tokenizer's declared special tokens and then
/// iterated uniformly; a category the tokenizer does not define is `None`
/// and masks nothing. Adding a category means adding a field here and a
/// row in [`Self::entries`], nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecialTokenMap {
    pub padding: Option<i64>,
    pub image_placeholder: Option<i64>,
    pub audio_placeholder: Option<i64>,
    pub image_boundary: Option<i64>,
}

impl SpecialTokenMap {
    pub const fn entries(&self) -> [(TokenCategory, Option<i64>); 4] {
        [
            (TokenCategory::Padding, self.padding),
            (TokenCategory::ImagePlaceholder, self.image_placeholder),
            (TokenCategory::AudioPlaceholder, self.audio_placeholder),
            (TokenCategory::ImageBoundary, self.image_boundary),
        ]
    }

    /// Token ids that are replaced with [`IGNORE_INDEX`] in labels.
    pub fn masked_ids(&self) -> impl Iterator<Item = i64> {
        self.entries().into_iter().filter_map(|(_, id)| id)
    }

    fn is_masked(&self, id: i64) -> bool {
        self.masked_ids().any(|masked| masked == id)
    }
}

/// One training example: a complete chat whose final assistant turn is
/// the training target.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub messages: Vec<ChatMessage>,
}

impl TrainingExample {
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// All image handles referenced by this example, in turn order.
    pub fn images(&self) -> Vec<ImageHandle> {
        self.messages
            .iter()
            .flat_map(|message| message.images().cloned())
            .collect()
    }
}

/// Padding behavior requested from the processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaddingStrategy {
    /// Pad every row to the longest row in the batch.
    #[default]
    Longest,
    /// Pad every row to a fixed length.
    MaxLength(usize),
}

/// Renders one example's messages into the single formatted string the
/// tokenizer consumes, per the model's chat template.
pub trait ChatTemplateRenderer: Send + Sync {
    fn render(&self, messages: &[ChatMessage]) -> Result<String, CollateError>;
}

/// Batch text-and-image encoder, the seam to the external tokenizer and
/// image preprocessor.
///
/// `texts` and `images` are parallel: `images[i]` holds the handles for
/// `texts[i]`. Output must contain one row per input text.
pub trait MultimodalProcessor: Send + Sync {
    fn encode(
        &self,
        texts: &[String],
        images: &[Vec<ImageHandle>],
        padding: PaddingStrategy,
    ) -> Result<EncodedBatch, CollateError>;
}

/// Flattened pixel data with its shape, one per image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

/// Processor output: tokenized rows plus preprocessed image tensors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedBatch {
    pub input_ids: Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
    pub pixel_values: Vec<PixelTensor>,
}

/// A model-ready batch: the encoded rows plus loss labels.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingBatch {
    pub input_ids: Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
    pub pixel_values: Vec<PixelTensor>,
    pub labels: Vec<Vec<i64>>,
}

/// Assembles model-ready batches from chat-formatted examples.
pub struct Collator<R, P> {
    renderer: R,
    processor: P,
    special: SpecialTokenMap,
    padding: PaddingStrategy,
}

impl<R: ChatTemplateRenderer, P: MultimodalProcessor> Collator<R, P> {
    pub const fn new(renderer: R, processor: P, special: SpecialTokenMap) -> Self {
        Self {
            renderer,
            processor,
            special,
            padding: PaddingStrategy::Longest,
        }
    }

    pub const fn with_padding(mut self, padding: PaddingStrategy) -> Self {
        self.padding = padding;
        self
    }

    /// Collate `examples` into one batch.
    ///
    /// Renders each example through the chat template, batch-encodes the
    /// rendered texts with their images, then derives labels by copying
    /// the token ids and masking every id in a masked category with
    /// [`IGNORE_INDEX`]. All other label positions equal their input ids.
    pub fn collate(&self, examples: &[TrainingExample]) -> Result<TrainingBatch, CollateError> {
        if examples.is_empty() {
            return Err(CollateError::EmptyBatch);
        }

        let mut texts = Vec::with_capacity(examples.len());
        let mut images = Vec::with_capacity(examples.len());
        for example in examples {
            texts.push(self.renderer.render(&example.messages)?);
            images.push(example.images());
        }

        let encoded = self.processor.encode(&texts, &images, self.padding)?;
        if encoded.input_ids.len() != examples.len() {
            return Err(CollateError::RowCountMismatch {
                expected: examples.len(),
                actual: encoded.input_ids.len(),
            });
        }

        let labels = mask_labels(&encoded.input_ids, &self.special);
        Ok(TrainingBatch {
            input_ids: encoded.input_ids,
            attention_mask: encoded.attention_mask,
            pixel_values: encoded.pixel_values,
            labels,
        })
    }
}

/// Copy token ids into labels, replacing every id belonging to a masked
/// category with [`IGNORE_INDEX`]. Unmasked positions are unchanged.
pub fn mask_labels(input_ids: &[Vec<i64>], special: &SpecialTokenMap) -> Vec<Vec<i64>> {
    input_ids
        .iter()
        .map(|row| {
            row.iter()
                .map(|&id| if special.is_masked(id) { IGNORE_INDEX } else { id })
                .collect()
        })
        .collect()
}
