// src/pipelines.rs

//! The compiled-in pipeline definitions.
//!
//! Task shapes, glob patterns and output layout mirror the stock
//! front-end tree: a working `dist/` source tree, transformed in place
//! (`dist/css`, `dist/js`, `dist/images/build`, `dist/fonts/fonts-build`),
//! and a final `build/` artifact tree assembled by the `build` pipeline.
//!
//! Asset knowledge lives in external tools; each task only wires glue
//! steps and tool invocations together. Options from the config (output
//! style, image quality, vendor-prefix targets) parameterize the tool
//! invocations here, once, at registry construction.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::config::ConfigFile;
use crate::graph::TaskNode;
use crate::reload::ReloadKind;
use crate::task::{Clean, Combine, Concat, Pipe, Task, Transform};
use crate::watch::WatchBinding;

/// Pipeline that builds everything and enters watch mode.
pub const DEFAULT_PIPELINE: &str = "default";
/// Pipeline that cleans and collects the final artifact tree.
pub const BUILD_PIPELINE: &str = "build";

/// Every runnable node by name, plus the watch bindings for the dev loop.
pub struct Registry {
    nodes: BTreeMap<String, Arc<TaskNode>>,
    pub bindings: Vec<WatchBinding>,
}

impl Registry {
    pub fn node(&self, name: &str) -> Option<&Arc<TaskNode>> {
        self.nodes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Only the default pipeline stays resident and watches.
    pub fn is_watch_pipeline(&self, name: &str) -> bool {
        name == DEFAULT_PIPELINE
    }
}

/// Build the registry from a validated config.
pub fn build(cfg: &ConfigFile) -> Result<Registry> {
    let src = cfg.paths.source_dir.trim_end_matches('/');
    let out = cfg.paths.build_dir.trim_end_matches('/');
    let quality = cfg.options.image_quality.to_string();
    let style = cfg.options.effective_output_style();
    let browsers = cfg.options.autoprefix_targets.join(", ");

    // Style sheets: one entry sheet, concatenated, vendor-prefixed and
    // compiled into a single minified file.
    let styles = Arc::new(
        Task::new(
            "styles",
            format!("{src}/scss"),
            &[format!("{src}/scss/style.scss")],
            vec![
                step(Concat::new("style.min.css")),
                step(
                    Pipe::new("autoprefix", "postcss", ["--use", "autoprefixer", "--no-map"])
                        .env("BROWSERSLIST", browsers),
                ),
                step(Pipe::new(
                    "scss",
                    "sass",
                    ["--stdin".to_string(), format!("--style={}", style.compiler_arg())],
                )),
            ],
            format!("{src}/css"),
        )?,
    );

    // Scripts: everything except the previous bundle, concatenated and
    // minified back into the bundle.
    let scripts = Arc::new(
        Task::new(
            "scripts",
            format!("{src}/js"),
            &[
                format!("{src}/js/*.js"),
                format!("!{src}/js/main.min.js"),
            ],
            vec![
                step(Concat::new("main.min.js")),
                step(Pipe::new("minify", "terser", ["--compress", "--mangle"])),
            ],
            format!("{src}/js"),
        )?,
    );

    // Images: compression is incremental (skip sources older than their
    // compressed copy); the modern-format sibling is regenerated for every
    // source on every run, deliberately.
    let images_compress = Arc::new(
        Task::new(
            "images:compress",
            format!("{src}/images/src-img"),
            &[format!("{src}/images/src-img/*.*")],
            vec![step(Pipe::new(
                "imagemin",
                "imagemin",
                [format!("--plugin.mozjpeg.quality={quality}")],
            ))],
            format!("{src}/images/build"),
        )?
        .incremental(),
    );

    let images_webp = Arc::new(
        Task::new(
            "images:webp",
            format!("{src}/images/src-img"),
            &[format!("{src}/images/src-img/*.*")],
            vec![step(
                Pipe::new(
                    "webp",
                    "cwebp",
                    ["-quiet", "-q", quality.as_str(), "-o", "-", "--", "-"],
                )
                .ext("webp"),
            )],
            format!("{src}/images/build"),
        )?,
    );

    // Icon sources combined into one vector sprite. The previous sprite is
    // excluded so the task never feeds on its own output.
    let sprite = Arc::new(
        Task::new(
            "sprite",
            format!("{src}/images/build"),
            &[
                format!("{src}/images/build/*.svg"),
                format!("!{src}/images/build/sprite.svg"),
            ],
            vec![step(Combine::new(
                "svg-sprite",
                "svg-sprite-generate",
                ["-o", "-"],
                "sprite.svg",
            ))],
            format!("{src}/images/build"),
        )?,
    );

    // Fonts: web-font formats generated side by side.
    let fonts_woff = Arc::new(
        Task::new(
            "fonts:woff",
            format!("{src}/fonts"),
            &[format!("{src}/fonts/*.ttf"), format!("{src}/fonts/*.otf")],
            vec![step(Pipe::new("woff", "ttf2woff", Vec::<String>::new()).ext("woff"))],
            format!("{src}/fonts/fonts-build"),
        )?,
    );

    let fonts_woff2 = Arc::new(
        Task::new(
            "fonts:woff2",
            format!("{src}/fonts"),
            &[format!("{src}/fonts/*.ttf")],
            vec![step(Pipe::new("woff2", "ttf2woff2", Vec::<String>::new()).ext("woff2"))],
            format!("{src}/fonts/fonts-build"),
        )?,
    );

    // Page templates: components expanded into servable pages.
    let pages = Arc::new(
        Task::new(
            "pages",
            format!("{src}/components"),
            &[format!("{src}/components/*.html")],
            vec![step(Pipe::new(
                "include",
                "posthtml",
                ["--use", "posthtml-include"],
            ))],
            cfg.paths.pages_dir.clone(),
        )?,
    );

    // Final artifact assembly.
    let clean = Arc::new(Task::new(
        "clean",
        out,
        &[format!("{out}/**")],
        vec![step(Clean)],
        out,
    )?);

    let collect = Arc::new(Task::new(
        "collect",
        src,
        &[
            format!("{src}/css/style.min.css"),
            format!("{src}/images/build/**"),
            format!("!{src}/images/build/**/*.svg"),
            format!("{src}/fonts/fonts-build/*.*"),
            format!("{src}/js/main.min.js"),
            format!("{src}/**/*.html"),
            format!("{src}/images/build/sprite.svg"),
        ],
        Vec::new(),
        out,
    )?);

    let mut nodes: BTreeMap<String, Arc<TaskNode>> = BTreeMap::new();

    let styles_node = insert_leaf(&mut nodes, &styles);
    let scripts_node = insert_leaf(&mut nodes, &scripts);
    let pages_node = insert_leaf(&mut nodes, &pages);
    insert_leaf(&mut nodes, &sprite);

    let images_node = Arc::new(TaskNode::series([
        TaskNode::Task(Arc::clone(&images_compress)),
        TaskNode::Task(Arc::clone(&images_webp)),
    ]));
    nodes.insert("images".into(), Arc::clone(&images_node));

    let fonts_node = Arc::new(TaskNode::series([
        TaskNode::Task(Arc::clone(&fonts_woff)),
        TaskNode::Task(Arc::clone(&fonts_woff2)),
    ]));
    nodes.insert("fonts".into(), Arc::clone(&fonts_node));

    insert_leaf(&mut nodes, &clean);
    insert_leaf(&mut nodes, &collect);

    let default_node = Arc::new(TaskNode::parallel([
        TaskNode::Task(Arc::clone(&styles)),
        TaskNode::Task(Arc::clone(&scripts)),
        TaskNode::series([
            TaskNode::Task(Arc::clone(&images_compress)),
            TaskNode::Task(Arc::clone(&images_webp)),
        ]),
        TaskNode::series([
            TaskNode::Task(Arc::clone(&fonts_woff)),
            TaskNode::Task(Arc::clone(&fonts_woff2)),
        ]),
        TaskNode::Task(Arc::clone(&pages)),
    ]));
    nodes.insert(DEFAULT_PIPELINE.into(), default_node);

    let build_node = Arc::new(TaskNode::series([
        TaskNode::Task(Arc::clone(&clean)),
        TaskNode::Task(Arc::clone(&collect)),
    ]));
    nodes.insert(BUILD_PIPELINE.into(), build_node);

    let bindings = vec![
        WatchBinding::new(
            "styles",
            &[format!("{src}/scss/**/*.scss")],
            Some(Arc::clone(&styles_node)),
            Some(ReloadKind::StyleInject),
        )?,
        WatchBinding::new(
            "scripts",
            &[format!("{src}/js/*.js"), format!("!{src}/js/main.min.js")],
            Some(Arc::clone(&scripts_node)),
            Some(ReloadKind::FullReload),
        )?,
        WatchBinding::new(
            "pages",
            &[format!("{src}/components/**/*.html")],
            Some(Arc::clone(&pages_node)),
            Some(ReloadKind::FullReload),
        )?,
        WatchBinding::new(
            "images",
            &[format!("{src}/images/src-img/**")],
            Some(Arc::clone(&images_node)),
            Some(ReloadKind::FullReload),
        )?,
        // Bare reload: any page edit refreshes connected browsers even
        // when no task is mapped to it.
        WatchBinding::new(
            "html",
            &[format!("{src}/**/*.html")],
            None,
            Some(ReloadKind::FullReload),
        )?,
    ];

    Ok(Registry { nodes, bindings })
}

/// Look up a node or fail with the list of valid names.
pub fn select<'r>(registry: &'r Registry, name: &str) -> Result<&'r Arc<TaskNode>> {
    registry.node(name).ok_or_else(|| {
        let known: Vec<&str> = registry.names().collect();
        anyhow!("unknown pipeline '{name}'; known pipelines: {known:?}")
    })
}

fn step<T: Transform + 'static>(transform: T) -> Arc<dyn Transform> {
    Arc::new(transform)
}

fn insert_leaf(nodes: &mut BTreeMap<String, Arc<TaskNode>>, task: &Arc<Task>) -> Arc<TaskNode> {
    let node = Arc::new(TaskNode::Task(Arc::clone(task)));
    nodes.insert(task.name.clone(), Arc::clone(&node));
    node
}
