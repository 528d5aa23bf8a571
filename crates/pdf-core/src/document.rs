//! PDF Document wrapper

use crate::image::{generate_image_operators, ImageXObject};
use crate::page::{PageGeometry, A4_HEIGHT, A4_WIDTH};
use crate::shapes::generate_circle_operators;
use crate::text::{encode_win_ansi, generate_text_operators, StandardFont, TextRenderContext};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Decoded PDF document with buffered overlay drawing
///
/// Drawing calls only buffer content operators; page dictionaries are
/// rewritten once in `to_bytes`. Every map is ordered so that the same
/// sequence of calls on the same input always produces the same bytes.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Page object IDs in page order (index 0 is the first page)
    page_ids: Vec<ObjectId>,
    /// Fonts referenced per page
    page_fonts: BTreeMap<usize, BTreeSet<StandardFont>>,
    /// Embedded images (content digest -> XObject)
    embedded_images: BTreeMap<[u8; 32], ObjectId>,
    /// Page image resources (page index -> resource name -> object ID)
    page_images: BTreeMap<usize, BTreeMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Buffered content operators per page
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
}

/// Trailer keys carried over from a loaded file
///
/// Everything else in a loaded trailer describes the old cross-reference
/// section and is rewritten on save.
const TRAILER_KEYS: [&[u8]; 4] = [b"Root", b"Info", b"ID", b"Encrypt"];

/// Object types the writer regenerates or never writes
const WRITER_SKIPPED_TYPES: [&str; 3] = ["ObjStm", "XRef", "Linearized"];

/// Make the serialized form depend only on the live object set
///
/// lopdf numbers the cross-reference stream after `max_id`, which a loaded
/// document takes from the old `/Size`, so every load and save cycle would
/// otherwise shift the stream to a new object id.
fn normalize(doc: &mut Document) {
    doc.objects.retain(|_, object| {
        object
            .type_name()
            .map(|name| !WRITER_SKIPPED_TYPES.contains(&name))
            .unwrap_or(true)
    });
    doc.max_id = doc.objects.keys().map(|&(id, _)| id).max().unwrap_or(0);

    let mut trailer = Dictionary::new();
    for key in TRAILER_KEYS {
        if let Ok(value) = doc.trailer.get(key) {
            trailer.set(key, value.clone());
        }
    }
    doc.trailer = trailer;
}

impl PdfDocument {
    /// Decode a PDF document from bytes
    ///
    /// The input slice is never modified. Fails with `DecodeError` when the
    /// bytes are not a PDF or the page tree is empty.
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let mut inner = Document::load_mem(data).map_err(|e| PdfError::DecodeError(e.to_string()))?;
        normalize(&mut inner);

        let page_ids: Vec<ObjectId> = inner.get_pages().into_values().collect();
        if page_ids.is_empty() {
            return Err(PdfError::DecodeError("document has no pages".to_string()));
        }

        Ok(Self {
            inner,
            page_ids,
            page_fonts: BTreeMap::new(),
            embedded_images: BTreeMap::new(),
            page_images: BTreeMap::new(),
            next_image_resource: 1,
            page_content_buffer: BTreeMap::new(),
        })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        self.page_ids
            .get(page)
            .copied()
            .ok_or(PdfError::InvalidPage(page, self.page_ids.len()))
    }

    /// Get the geometry of a page
    ///
    /// Reads the MediaBox (or CropBox), following the parent chain for
    /// inherited boxes. Pages without either are treated as A4.
    pub fn page_geometry(&self, page: usize) -> Result<PageGeometry> {
        let page_id = self.page_id(page)?;

        match self.get_inherited_box(page_id)? {
            Some([llx, lly, urx, ury]) => Ok(PageGeometry::from_media_box(page, llx, lly, urx, ury)),
            None => Ok(PageGeometry::new(page, A4_WIDTH, A4_HEIGHT)),
        }
    }

    /// Get MediaBox or CropBox, following parent inheritance chain if needed
    fn get_inherited_box(&self, page_id: ObjectId) -> Result<Option<[f64; 4]>> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels
        for _ in 0..10 {
            let dict = self.dict(current_id)?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let array = self.resolve(media_box).as_array().map_err(|_| {
                    PdfError::ParseError("MediaBox is not an array".to_string())
                })?;
                if array.len() < 4 {
                    return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
                }
                let mut numbers = [0.0f64; 4];
                for (slot, obj) in numbers.iter_mut().zip(array) {
                    *slot = number(self.resolve(obj)).ok_or_else(|| {
                        PdfError::ParseError("MediaBox entry is not a number".to_string())
                    })?;
                }
                return Ok(Some(numbers));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(None)
    }

    /// Draw one line of text with its baseline at `(x, y)` in PDF coordinates
    ///
    /// Empty text draws nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        page: usize,
        text: &str,
        x: f64,
        y: f64,
        font: StandardFont,
        font_size: f32,
        color: Color,
    ) -> Result<()> {
        self.page_id(page)?;

        if text.is_empty() {
            return Ok(());
        }

        self.page_fonts.entry(page).or_default().insert(font);

        let ctx = TextRenderContext {
            font_name: font.resource_name().to_string(),
            font_size,
            color,
        };
        let operators = generate_text_operators(&encode_win_ansi(text), x, y, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a filled circle centered at `(cx, cy)` in PDF coordinates
    pub fn fill_circle(
        &mut self,
        page: usize,
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    ) -> Result<()> {
        self.page_id(page)?;

        let operators = generate_circle_operators(cx, cy, radius, color);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw an image into the rectangle `(x, y, width, height)` in PDF coordinates
    ///
    /// The rectangle is used as given; aspect-ratio fitting is the caller's job.
    /// Identical images are embedded once per document.
    pub fn draw_image(
        &mut self,
        page: usize,
        image: &ImageXObject,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.page_id(page)?;

        let object_id = self.embed_image(image);
        let resource_name = self.image_resource_name(page, object_id)?;

        let operators = generate_image_operators(&resource_name, x, y, width, height);
        self.buffer_content(page, &operators);

        Ok(())
    }

    fn embed_image(&mut self, image: &ImageXObject) -> ObjectId {
        let mut hasher = Sha256::new();
        hasher.update(&image.data);
        if let Some(alpha) = &image.alpha {
            hasher.update(alpha);
        }
        let digest: [u8; 32] = hasher.finalize().into();

        if let Some(existing) = self.embedded_images.get(&digest) {
            return *existing;
        }

        let soft_mask = image
            .soft_mask_stream()
            .map(|stream| self.inner.add_object(stream));
        let object_id = self.inner.add_object(image.to_pdf_stream(soft_mask));

        self.embedded_images.insert(digest, object_id);
        object_id
    }

    /// Get or create the resource name of an image on a page
    ///
    /// Names already present in the page's own XObject resources are skipped.
    fn image_resource_name(&mut self, page: usize, object_id: ObjectId) -> Result<String> {
        if let Some(names) = self.page_images.get(&page) {
            if let Some((name, _)) = names.iter().find(|(_, id)| **id == object_id) {
                return Ok(name.clone());
            }
        }

        let existing = self.existing_xobject_names(page)?;
        let resource_name = loop {
            let candidate = format!("FbIm{}", self.next_image_resource);
            self.next_image_resource += 1;
            if !existing.contains(candidate.as_bytes()) {
                break candidate;
            }
        };

        self.page_images
            .entry(page)
            .or_default()
            .insert(resource_name.clone(), object_id);

        Ok(resource_name)
    }

    fn existing_xobject_names(&self, page: usize) -> Result<BTreeSet<Vec<u8>>> {
        let resources = self.effective_resources(self.page_id(page)?)?;
        let names = resources
            .get(b"XObject")
            .ok()
            .and_then(|xobjects| self.resolve(xobjects).as_dict().ok())
            .map(|dict| dict.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default();
        Ok(names)
    }

    /// Serialize the document, flushing all buffered drawing first
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        normalize(&mut self.inner);

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Write buffered operators and their resources into the page dictionaries
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers = std::mem::take(&mut self.page_content_buffer);
        if buffers.is_empty() {
            return Ok(());
        }

        let font_ids = self.embed_standard_fonts();
        let mut save_state_id = None;

        for (page, content) in buffers {
            if content.is_empty() {
                continue;
            }
            self.install_page_resources(page, &font_ids)?;
            self.append_to_content_stream(page, &content, &mut save_state_id)?;
        }

        self.page_fonts.clear();
        self.page_images.clear();
        Ok(())
    }

    /// Add one Type1 font dictionary per standard font in use
    fn embed_standard_fonts(&mut self) -> BTreeMap<StandardFont, ObjectId> {
        let used: BTreeSet<StandardFont> = self.page_fonts.values().flatten().copied().collect();

        used.into_iter()
            .map(|font| {
                let mut dict = Dictionary::new();
                dict.set("Type", Object::Name(b"Font".to_vec()));
                dict.set("Subtype", Object::Name(b"Type1".to_vec()));
                dict.set("BaseFont", Object::Name(font.base_font().as_bytes().to_vec()));
                dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
                (font, self.inner.add_object(dict))
            })
            .collect()
    }

    /// Give a page its own Resources dictionary containing the overlay's fonts and images
    ///
    /// Shared or inherited resources are copied rather than edited in place,
    /// so other pages are unaffected.
    fn install_page_resources(
        &mut self,
        page: usize,
        font_ids: &BTreeMap<StandardFont, ObjectId>,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut resources = self.effective_resources(page_id)?;

        if let Some(fonts) = self.page_fonts.get(&page) {
            let mut font_dict = self.sub_dictionary(&resources, b"Font");
            for font in fonts {
                let font_id = font_ids
                    .get(font)
                    .ok_or_else(|| PdfError::SaveError(format!("font {font:?} not embedded")))?;
                font_dict.set(font.resource_name(), Object::Reference(*font_id));
            }
            resources.set("Font", Object::Dictionary(font_dict));
        }

        if let Some(images) = self.page_images.get(&page) {
            let mut xobject_dict = self.sub_dictionary(&resources, b"XObject");
            for (name, object_id) in images {
                xobject_dict.set(name.as_bytes(), Object::Reference(*object_id));
            }
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let mut page_dict = self.dict(page_id)?.clone();
        page_dict.set("Resources", Object::Dictionary(resources));
        self.inner.objects.insert(page_id, Object::Dictionary(page_dict));

        Ok(())
    }

    /// Resources in effect for a page: its own, else the nearest ancestor's
    fn effective_resources(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut current_id = page_id;

        for _ in 0..10 {
            let dict = self.dict(current_id)?;

            if let Ok(resources) = dict.get(b"Resources") {
                return Ok(self
                    .resolve(resources)
                    .as_dict()
                    .cloned()
                    .unwrap_or_else(|_| Dictionary::new()));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(Dictionary::new())
    }

    fn sub_dictionary(&self, resources: &Dictionary, key: &[u8]) -> Dictionary {
        resources
            .get(key)
            .ok()
            .and_then(|obj| self.resolve(obj).as_dict().ok())
            .cloned()
            .unwrap_or_else(Dictionary::new)
    }

    /// Append overlay content to a page
    ///
    /// Existing content is bracketed by `q`/`Q` so any graphics state it
    /// leaves behind (transforms, colors, clipping) cannot displace the
    /// overlay. The original content streams are referenced, not rewritten.
    fn append_to_content_stream(
        &mut self,
        page: usize,
        content: &[u8],
        save_state_id: &mut Option<ObjectId>,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut page_dict = self.dict(page_id)?.clone();

        let existing: Vec<Object> = match page_dict.get(b"Contents") {
            Ok(Object::Reference(id)) => match self.inner.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Stream(stream)) => {
                let stream = stream.clone();
                vec![Object::Reference(self.inner.add_object(stream))]
            }
            _ => Vec::new(),
        };

        let contents = if existing.is_empty() {
            let overlay_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), content.to_vec()));
            vec![Object::Reference(overlay_id)]
        } else {
            let q_id = *save_state_id.get_or_insert_with(|| {
                self.inner
                    .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()))
            });

            let mut overlay = b"Q\n".to_vec();
            overlay.extend_from_slice(content);
            let overlay_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), overlay));

            let mut contents = Vec::with_capacity(existing.len() + 2);
            contents.push(Object::Reference(q_id));
            contents.extend(existing);
            contents.push(Object::Reference(overlay_id));
            contents
        };

        page_dict.set("Contents", Object::Array(contents));
        self.inner.objects.insert(page_id, Object::Dictionary(page_dict));

        Ok(())
    }

    fn dict(&self, id: ObjectId) -> Result<&Dictionary> {
        self.inner
            .get_object(id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError(format!("object {id:?} is not a dictionary")))
    }

    /// Follow a single indirect reference, if any
    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.inner.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
