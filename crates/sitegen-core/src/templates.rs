//! Keyword-selected placeholder websites
//!
//! Used when a structured page cannot be transpiled for preview, and when the
//! service reports an incomplete generation and a site is synthesized locally.

use chrono::Utc;
use sitegen_types::{Artifact, ArtifactMetadata, GenerateRequest};
use tracing::info;

const FASHION: &str = r##"<div class="min-h-screen bg-gradient-to-br from-pink-500 via-purple-500 to-indigo-600 text-white">
  <header class="bg-black/20 backdrop-blur-sm p-6">
    <div class="max-w-6xl mx-auto flex justify-between items-center">
      <h1 class="text-3xl font-bold">Fashion Store</h1>
      <nav class="hidden md:flex space-x-8">
        <a href="#" class="hover:text-pink-300 transition-colors">Collections</a>
        <a href="#" class="hover:text-pink-300 transition-colors">New Arrivals</a>
        <a href="#" class="hover:text-pink-300 transition-colors">Sale</a>
        <a href="#" class="hover:text-pink-300 transition-colors">Contact</a>
      </nav>
    </div>
  </header>
  <main class="p-8">
    <div class="max-w-6xl mx-auto text-center">
      <h1 class="text-6xl font-bold mb-6 bg-gradient-to-r from-pink-400 to-purple-400 bg-clip-text text-transparent">
        Modern Fashion
      </h1>
      <p class="text-xl mb-8 opacity-90">Discover the latest trends in fashion</p>
      <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mt-12">
        <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
          <div class="w-full h-48 bg-gradient-to-br from-pink-400 to-red-400 rounded-lg mb-4"></div>
          <h3 class="text-xl font-semibold">Summer Collection</h3>
          <p class="opacity-80">Fresh styles for the season</p>
        </div>
        <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
          <div class="w-full h-48 bg-gradient-to-br from-purple-400 to-blue-400 rounded-lg mb-4"></div>
          <h3 class="text-xl font-semibold">Evening Wear</h3>
          <p class="opacity-80">Elegant pieces for special occasions</p>
        </div>
        <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
          <div class="w-full h-48 bg-gradient-to-br from-green-400 to-teal-400 rounded-lg mb-4"></div>
          <h3 class="text-xl font-semibold">Casual Chic</h3>
          <p class="opacity-80">Comfortable yet stylish</p>
        </div>
      </div>
    </div>
  </main>
  <footer class="bg-black/30 backdrop-blur-sm p-6 text-center">
    <p class="opacity-80">&copy; Fashion Store. All rights reserved.</p>
  </footer>
</div>"##;

const PHOTOGRAPHY: &str = r##"<div class="min-h-screen bg-gray-900 text-white">
  <header class="bg-gray-800 p-4">
    <h1 class="text-2xl font-bold">Photographer's Portfolio</h1>
  </header>
  <main class="p-8">
    <div class="text-center">
      <h1 class="text-4xl font-bold mb-4">Professional Photography</h1>
      <p class="text-gray-300 mb-8">Capturing moments that last forever</p>
      <div class="grid grid-cols-3 gap-4">
        <div class="bg-gray-700 p-4 rounded">Gallery Item 1</div>
        <div class="bg-gray-700 p-4 rounded">Gallery Item 2</div>
        <div class="bg-gray-700 p-4 rounded">Gallery Item 3</div>
      </div>
    </div>
  </main>
  <footer class="bg-gray-800 p-4 text-center">
    <p>&copy; Photographer's Portfolio</p>
  </footer>
</div>"##;

const RESTAURANT: &str = r##"<div class="min-h-screen bg-gradient-to-br from-orange-400 to-red-500 text-white">
  <header class="bg-black/20 backdrop-blur-sm p-6">
    <h1 class="text-3xl font-bold">Restaurant Name</h1>
  </header>
  <main class="p-8 text-center">
    <h1 class="text-5xl font-bold mb-4">Delicious Food</h1>
    <p class="text-xl mb-8">Experience culinary excellence</p>
    <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mt-12">
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-4">Appetizers</div>
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-4">Main Course</div>
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-4">Desserts</div>
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-4">Beverages</div>
    </div>
  </main>
  <footer class="bg-black/30 backdrop-blur-sm p-6 text-center">
    <p>&copy; Restaurant. All rights reserved.</p>
  </footer>
</div>"##;

const GENERIC: &str = r##"<div class="min-h-screen bg-gradient-to-br from-blue-600 via-purple-600 to-pink-600 text-white">
  <header class="bg-black/20 backdrop-blur-sm p-6">
    <h1 class="text-3xl font-bold">{{header}}</h1>
  </header>
  <main class="p-8 text-center">
    <h1 class="text-5xl font-bold mb-4 bg-gradient-to-r from-yellow-400 to-pink-400 bg-clip-text text-transparent">
      Welcome to {{welcome}}
    </h1>
    <p class="text-xl mb-8 opacity-90">{{description}}</p>
    <div class="grid grid-cols-1 md:grid-cols-3 gap-6 mt-12">
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
        <h3 class="text-xl font-semibold mb-2">Modern Design</h3>
        <p class="opacity-80">Clean and contemporary</p>
      </div>
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
        <h3 class="text-xl font-semibold mb-2">Responsive</h3>
        <p class="opacity-80">Works on all devices</p>
      </div>
      <div class="bg-white/10 backdrop-blur-sm rounded-lg p-6 hover:bg-white/20 transition-all">
        <h3 class="text-xl font-semibold mb-2">Fast Loading</h3>
        <p class="opacity-80">Optimized performance</p>
      </div>
    </div>
  </main>
  <footer class="bg-black/30 backdrop-blur-sm p-6 text-center">
    <p class="opacity-80">Generated with AI Website Builder</p>
  </footer>
</div>"##;

const DEFAULT_DESCRIPTION: &str = "A modern, responsive website built with the latest technologies";

/// Website category inferred from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Fashion,
    Photography,
    Restaurant,
    Generic,
}

impl TemplateKind {
    /// Pick a template from the given texts. Matching is case-insensitive
    /// and the first category with a hit in any text wins.
    pub fn detect<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let haystack: Vec<String> = texts.into_iter().map(|t| t.to_lowercase()).collect();
        let any = |needles: &[&str]| {
            haystack
                .iter()
                .any(|text| needles.iter().any(|needle| text.contains(needle)))
        };

        if any(&["fashion"]) {
            TemplateKind::Fashion
        } else if any(&["photography", "photographer"]) {
            TemplateKind::Photography
        } else if any(&["restaurant", "food"]) {
            TemplateKind::Restaurant
        } else {
            TemplateKind::Generic
        }
    }

    /// Metadata category recorded on synthesized artifacts
    pub fn category(&self) -> &'static str {
        match self {
            TemplateKind::Fashion => "fashion",
            TemplateKind::Photography => "photography",
            TemplateKind::Restaurant => "restaurant",
            TemplateKind::Generic => "general",
        }
    }

    /// Body markup. Title and description only appear in the generic
    /// template and are escaped before substitution.
    pub fn render(&self, title: &str, description: &str) -> String {
        match self {
            TemplateKind::Fashion => FASHION.to_string(),
            TemplateKind::Photography => PHOTOGRAPHY.to_string(),
            TemplateKind::Restaurant => RESTAURANT.to_string(),
            TemplateKind::Generic => {
                let header = non_empty_or(title, "Modern Website");
                let welcome = non_empty_or(title, "Your Website");
                let description = non_empty_or(description, DEFAULT_DESCRIPTION);
                GENERIC
                    .replace("{{header}}", &escape_html(header))
                    .replace("{{welcome}}", &escape_html(welcome))
                    .replace("{{description}}", &escape_html(description))
            }
        }
    }
}

/// Placeholder body for an artifact, chosen from its prompt, title and
/// description.
pub fn template_for(artifact: &Artifact) -> String {
    let kind = TemplateKind::detect([
        artifact.prompt.as_str(),
        artifact.title.as_str(),
        artifact.description.as_str(),
    ]);
    kind.render(&artifact.title, &artifact.description)
}

/// Synthesize a legacy website locally after the service reported an
/// incomplete generation.
pub fn fallback_artifact(request: &GenerateRequest) -> Artifact {
    let kind = TemplateKind::detect([request.prompt.as_str()]);
    let title = request
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Generated Website".to_string());
    let description = request
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "A beautiful website generated for you".to_string());

    info!("Creating {} fallback website", kind.category());

    Artifact {
        id: format!("fallback-{}", uuid::Uuid::new_v4()),
        html_content: kind.render(
            request.title.as_deref().unwrap_or_default(),
            request.description.as_deref().unwrap_or_default(),
        ),
        css_content: String::new(),
        title,
        description,
        prompt: request.prompt.clone(),
        is_public: request.is_public.unwrap_or(false),
        created_at: Utc::now(),
        metadata: Some(ArtifactMetadata {
            theme: Some("modern".to_string()),
            category: Some(kind.category().to_string()),
            features: vec![
                "responsive".to_string(),
                "modern-design".to_string(),
                "tailwind-css".to_string(),
            ],
            framework: Some("html".to_string()),
            styling: Some("tailwind-css".to_string()),
            package_json: None,
        }),
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
