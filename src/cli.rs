//! CLI argument definitions for the v5rt tool binaries.
//!
//! All four tools take positional, order-sensitive arguments so they
//! can be invoked from build scripts without flag plumbing. Where a
//! variadic list precedes a final path (keep-entries then the output),
//! the split happens here rather than in each binary.

use crate::trim::StripSpec;
use camino::Utf8PathBuf;
use clap::Parser;

/// Fetch an SDK release, verify its digest, and extract it.
#[derive(Parser, Debug, Default)]
#[command(name = "v5rt-get")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download a VEX V5 SDK release zip, verify its SHA-256 digest, and ",
    "extract it.\n\n",
    "With keep entries, only those files or directories (matched by ",
    "basename against the SDK's vexv5 and vexv5/include directories) are ",
    "copied into the output directory. Without keep entries the whole ",
    "extracted tree is copied.\n\n",
    "On a digest mismatch the downloaded archive is deleted and the run ",
    "fails.",
))]
pub struct GetArgs {
    /// Release identifier, used verbatim in the download URL.
    pub release: String,

    /// Expected SHA-256 digest, 64 lowercase hex characters.
    pub digest: String,

    /// Keep-list entries followed by the output directory (the last
    /// argument is always the output directory).
    #[arg(required = true, value_name = "KEEP-ENTRY|OUTPUT-DIR")]
    pub entries: Vec<String>,
}

impl GetArgs {
    /// Split the trailing positional list into keep entries and the
    /// output directory.
    #[must_use]
    pub fn keep_and_output(&self) -> Option<(&[String], Utf8PathBuf)> {
        self.entries
            .split_last()
            .map(|(last, rest)| (rest, Utf8PathBuf::from(last)))
    }
}

/// Patch SDK headers with the AAPCS calling-convention attribute.
#[derive(Parser, Debug, Default)]
#[command(name = "v5rt-patch-headers")]
#[command(version, about)]
#[command(long_about = concat!(
    "Patch SDK C headers, inserting __attribute__((pcs(\"aapcs\"))) on ",
    "every function declaration and rewriting v5_* includes to their ",
    "_patched siblings.\n\n",
    "Each input header <name>.<ext> is written to ",
    "<output-dir>/<name>_patched.<ext>; inputs are never modified. The ",
    "batch aborts on the first file that fails.",
))]
pub struct PatchArgs {
    /// Header files to patch, followed by the output directory (the
    /// last argument is always the output directory).
    #[arg(required = true, value_name = "HEADER|OUTPUT-DIR")]
    pub paths: Vec<Utf8PathBuf>,

    /// Leave #include directives untouched.
    #[arg(long)]
    pub no_include_rewrite: bool,
}

impl PatchArgs {
    /// Split the positional list into input headers and the output
    /// directory. Returns `None` when no header precedes the output.
    #[must_use]
    pub fn headers_and_output(&self) -> Option<(&[Utf8PathBuf], &Utf8PathBuf)> {
        match self.paths.split_last() {
            Some((last, rest)) if !rest.is_empty() => Some((rest, last)),
            _ => None,
        }
    }
}

/// Trim a static archive down to a keep-list of object members.
#[derive(Parser, Debug, Default)]
#[command(name = "v5rt-trim")]
#[command(version, about)]
#[command(long_about = concat!(
    "Trim a static archive to the requested object members, invoking the ",
    "given archiver tool for listing, extraction, and re-archiving.\n\n",
    "Requested members absent from the input are reported and skipped; ",
    "if none of them exist the run fails. With --strip-tool, ELF members ",
    "have the given symbols (-N) and sections (-R) removed before ",
    "re-archiving.",
))]
pub struct TrimArgs {
    /// The source static archive.
    pub archive: Utf8PathBuf,

    /// Path or name of the archiver tool (e.g. arm-none-eabi-ar).
    pub archiver: String,

    /// Object member names to keep, followed by the output archive (the
    /// last argument is always the output archive).
    #[arg(required = true, value_name = "OBJECT|OUTPUT-ARCHIVE")]
    pub names: Vec<String>,

    /// Object-editing tool used to strip ELF members before re-archiving.
    #[arg(long, value_name = "TOOL")]
    pub strip_tool: Option<String>,

    /// Symbol to strip from ELF members (repeatable).
    #[arg(short = 'N', long = "strip-symbol", value_name = "SYMBOL", requires = "strip_tool")]
    pub symbols: Vec<String>,

    /// Section to remove from ELF members (repeatable).
    #[arg(short = 'R', long = "remove-section", value_name = "SECTION", requires = "strip_tool")]
    pub sections: Vec<String>,
}

impl TrimArgs {
    /// Split the positional list into member names and the output
    /// archive. Returns `None` when no member precedes the output.
    #[must_use]
    pub fn members_and_output(&self) -> Option<(&[String], Utf8PathBuf)> {
        match self.names.split_last() {
            Some((last, rest)) if !rest.is_empty() => Some((rest, Utf8PathBuf::from(last))),
            _ => None,
        }
    }

    /// Build the strip specification when a strip tool was given.
    #[must_use]
    pub fn strip_spec(&self) -> Option<StripSpec> {
        self.strip_tool.as_ref().map(|tool| StripSpec {
            tool: tool.clone(),
            symbols: self.symbols.clone(),
            sections: self.sections.clone(),
        })
    }
}

/// Wrap an external strip tool driven by an options file.
#[derive(Parser, Debug, Default)]
#[command(name = "v5rt-strip")]
#[command(version, about)]
#[command(long_about = concat!(
    "Run an external strip tool over a static archive.\n\n",
    "The options file contains one line of whitespace-separated flags ",
    "passed verbatim to the tool, followed by the input and `-o <output>`. ",
    "When a second output path is given, the stripped archive is copied ",
    "there as well.",
))]
pub struct StripArgs {
    /// Path or name of the strip tool.
    pub tool: String,

    /// The archive to strip.
    pub input: Utf8PathBuf,

    /// File containing one line of flags for the strip tool.
    pub options_file: Utf8PathBuf,

    /// Primary output path.
    pub output: Utf8PathBuf,

    /// Optional second output path receiving a copy.
    pub second_output: Option<Utf8PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_args_split_keep_entries_from_output() {
        let args = GetArgs::parse_from([
            "v5rt-get",
            "V5_20240802_15_00_00",
            &"a".repeat(64),
            "v5_api.h",
            "v5_apitypes.h",
            "sdk-out",
        ]);
        let (keep, output) = args.keep_and_output().expect("split");
        assert_eq!(keep, ["v5_api.h".to_owned(), "v5_apitypes.h".to_owned()]);
        assert_eq!(output, Utf8PathBuf::from("sdk-out"));
    }

    #[test]
    fn get_args_accept_output_dir_only() {
        let args = GetArgs::parse_from(["v5rt-get", "V5_1", &"a".repeat(64), "sdk-out"]);
        let (keep, output) = args.keep_and_output().expect("split");
        assert!(keep.is_empty());
        assert_eq!(output, Utf8PathBuf::from("sdk-out"));
    }

    #[test]
    fn get_args_require_the_trailing_list() {
        let result = GetArgs::try_parse_from(["v5rt-get", "V5_1", &"a".repeat(64)]);
        assert!(result.is_err());
    }

    #[test]
    fn patch_args_require_a_header_before_the_output() {
        let args = PatchArgs::parse_from(["v5rt-patch-headers", "out"]);
        assert!(args.headers_and_output().is_none());

        let args = PatchArgs::parse_from(["v5rt-patch-headers", "v5_api.h", "out"]);
        let (headers, output) = args.headers_and_output().expect("split");
        assert_eq!(headers, [Utf8PathBuf::from("v5_api.h")]);
        assert_eq!(output, &Utf8PathBuf::from("out"));
    }

    #[test]
    fn trim_args_split_members_from_output() {
        let args = TrimArgs::parse_from([
            "v5rt-trim",
            "libv5rt.a",
            "arm-none-eabi-ar",
            "a.c.obj",
            "b.c.obj",
            "libv5.a",
        ]);
        let (members, output) = args.members_and_output().expect("split");
        assert_eq!(members, ["a.c.obj".to_owned(), "b.c.obj".to_owned()]);
        assert_eq!(output, Utf8PathBuf::from("libv5.a"));
        assert!(args.strip_spec().is_none());
    }

    #[test]
    fn trim_args_build_strip_spec_from_flags() {
        let args = TrimArgs::parse_from([
            "v5rt-trim",
            "--strip-tool",
            "objcopy",
            "-N",
            "memcpy",
            "-R",
            ".comment",
            "libv5rt.a",
            "ar",
            "a.c.obj",
            "libv5.a",
        ]);
        let spec = args.strip_spec().expect("strip spec");
        assert_eq!(spec.tool, "objcopy");
        assert_eq!(spec.symbols, ["memcpy".to_owned()]);
        assert_eq!(spec.sections, [".comment".to_owned()]);
    }

    #[test]
    fn trim_args_reject_strip_flags_without_tool() {
        let result = TrimArgs::try_parse_from([
            "v5rt-trim",
            "-N",
            "memcpy",
            "libv5rt.a",
            "ar",
            "a.c.obj",
            "libv5.a",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn strip_args_second_output_is_optional() {
        let args = StripArgs::parse_from([
            "v5rt-strip",
            "arm-none-eabi-strip",
            "libv5.a",
            "options.txt",
            "out/libv5.a",
        ]);
        assert!(args.second_output.is_none());

        let args = StripArgs::parse_from([
            "v5rt-strip",
            "arm-none-eabi-strip",
            "libv5.a",
            "options.txt",
            "out/libv5.a",
            "mirror/libv5.a",
        ]);
        assert_eq!(
            args.second_output,
            Some(Utf8PathBuf::from("mirror/libv5.a"))
        );
    }
}
