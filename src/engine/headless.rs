//! Headless session backed by RCSB downloads.
//!
//! `rcsb://<ID>` is fetched as `<download_url><id>.cif` on a worker
//! thread, optionally through a local cache directory. The scene is kept
//! as plain data (components, representations, camera target) so the
//! binary can report what would be on screen.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use pdbtbx::{Format, ReadOptions, StrictnessLevel, PDB};

use super::{
    load_channel, CameraFit, ComponentId, PendingLoad, RenderSession,
    Representation, SessionConfig,
};
use crate::error::MutaviewError;
use crate::options::ViewerOptions;

/// Atom-level facts about a downloaded structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructureSummary {
    /// PDB id the structure was loaded for.
    pub reference_id: String,
    /// Number of atoms in the structure.
    pub atom_count: usize,
    /// Chain ids, sorted.
    pub chains: BTreeSet<String>,
    /// Residue serial numbers present in any chain.
    pub residues: BTreeSet<isize>,
}

impl StructureSummary {
    /// Parse mmCIF text and summarize its atoms.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::StructureLoad`] if the text is not a
    /// readable mmCIF file.
    pub fn from_mmcif(
        reference_id: &str,
        cif: &str,
    ) -> Result<Self, MutaviewError> {
        let (pdb, warnings) = ReadOptions::default()
            .set_format(Format::Mmcif)
            .set_level(StrictnessLevel::Loose)
            .read_raw(BufReader::new(cif.as_bytes()))
            .map_err(|e| {
                MutaviewError::StructureLoad(format!(
                    "failed to parse {reference_id}: {e:?}"
                ))
            })?;
        if !warnings.is_empty() {
            log::debug!("{reference_id}: {} parse warnings", warnings.len());
        }
        Ok(Self::from_pdb(reference_id, &pdb))
    }

    fn from_pdb(reference_id: &str, pdb: &PDB) -> Self {
        let mut summary = Self {
            reference_id: reference_id.to_owned(),
            atom_count: pdb.atom_count(),
            ..Self::default()
        };
        for chain in pdb.chains() {
            let _ = summary.chains.insert(chain.id().to_owned());
            for residue in chain.residues() {
                let _ = summary.residues.insert(residue.serial_number());
            }
        }
        summary
    }

    /// Whether residue `position` appears in the structure.
    #[must_use]
    pub fn has_residue(&self, position: u32) -> bool {
        isize::try_from(position).is_ok_and(|p| self.residues.contains(&p))
    }
}

/// A component in the headless scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneComponent {
    /// Handle returned by [`RenderSession::add_component`].
    pub id: ComponentId,
    /// The loaded structure.
    pub summary: StructureSummary,
    /// Representations, in the order they were added.
    pub representations: Vec<Representation>,
    /// Last camera target, if any.
    pub camera: Option<CameraFit>,
}

/// Session that downloads structures and records the scene as data.
#[derive(Debug)]
pub struct HeadlessSession {
    config: SessionConfig,
    source_scheme: String,
    download_url: String,
    cache_dir: Option<PathBuf>,
    components: Vec<SceneComponent>,
    next_id: u32,
}

impl HeadlessSession {
    /// Create a session using the download settings in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`MutaviewError::Io`] if the cache directory cannot be
    /// created.
    pub fn create(
        config: &SessionConfig,
        options: &ViewerOptions,
    ) -> Result<Self, MutaviewError> {
        if let Some(dir) = &options.cache_dir {
            std::fs::create_dir_all(dir)?;
        }
        log::debug!(
            "headless session created (background {})",
            config.background_color
        );
        Ok(Self {
            config: config.clone(),
            source_scheme: options.source_scheme.clone(),
            download_url: options.download_url.clone(),
            cache_dir: options.cache_dir.clone(),
            components: Vec::new(),
            next_id: 0,
        })
    }

    /// Components currently in the scene.
    #[must_use]
    pub fn components(&self) -> &[SceneComponent] {
        &self.components
    }

    /// Multi-line description of the scene.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!("background {}\n", self.config.background_color);
        for c in &self.components {
            let s = &c.summary;
            let _ = writeln!(
                out,
                "{}: {} atoms, {} chains",
                s.reference_id,
                s.atom_count,
                s.chains.len()
            );
            for r in &c.representations {
                let _ = writeln!(
                    out,
                    "  {} [{}] color={}{}",
                    r.kind.name(),
                    r.selection.as_deref().unwrap_or("all"),
                    r.color,
                    r.radius.map(|v| format!(" radius={v}")).unwrap_or_default()
                );
            }
            match &c.camera {
                Some(CameraFit::Whole) => out.push_str("  camera: whole\n"),
                Some(CameraFit::Residue {
                    selection,
                    duration_ms,
                }) => {
                    let _ = writeln!(
                        out,
                        "  camera: residue {selection} over {duration_ms}ms"
                    );
                }
                None => {}
            }
        }
        out
    }

    fn component_mut(
        &mut self,
        id: ComponentId,
    ) -> Option<&mut SceneComponent> {
        self.components.iter_mut().find(|c| c.id == id)
    }
}

impl RenderSession for HeadlessSession {
    type Structure = StructureSummary;

    fn remove_all_components(&mut self) {
        self.components.clear();
    }

    fn load_file(
        &mut self,
        source_uri: &str,
    ) -> PendingLoad<StructureSummary> {
        let Some(reference_id) = source_uri.strip_prefix(&self.source_scheme)
        else {
            return PendingLoad::ready(Err(MutaviewError::StructureLoad(
                format!("unsupported source {source_uri}"),
            )));
        };
        let reference_id = reference_id.to_owned();
        let download_url = self.download_url.clone();
        let cache_dir = self.cache_dir.clone();

        let (reply, pending) = load_channel();
        let spawned = std::thread::Builder::new()
            .name(format!("load-{reference_id}"))
            .spawn(move || {
                let result = fetch_mmcif(
                    &download_url,
                    cache_dir.as_deref(),
                    &reference_id,
                )
                .and_then(|cif| {
                    StructureSummary::from_mmcif(&reference_id, &cif)
                });
                reply.complete(result);
            });
        if let Err(e) = spawned {
            // The reply went down with the closure, so the pending load
            // already reads as failed.
            log::error!("failed to spawn load thread: {e}");
        }
        pending
    }

    fn add_component(&mut self, structure: StructureSummary) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        log::debug!(
            "component {} <- {} ({} atoms)",
            id.0,
            structure.reference_id,
            structure.atom_count
        );
        self.components.push(SceneComponent {
            id,
            summary: structure,
            representations: Vec::new(),
            camera: None,
        });
        id
    }

    fn add_representation(
        &mut self,
        component: ComponentId,
        representation: &Representation,
    ) {
        let Some(c) = self.component_mut(component) else {
            log::warn!("representation for unknown component {}", component.0);
            return;
        };
        if let Some(position) = representation
            .selection
            .as_deref()
            .and_then(|s| s.parse::<u32>().ok())
        {
            if !c.summary.has_residue(position) {
                log::warn!(
                    "residue {position} not found in {}",
                    c.summary.reference_id
                );
            }
        }
        c.representations.push(representation.clone());
    }

    fn auto_view(&mut self, component: ComponentId, fit: &CameraFit) {
        if let Some(c) = self.component_mut(component) {
            c.camera = Some(fit.clone());
        }
    }
}

/// Read `<id>.cif` from the cache, or download it (and fill the cache).
fn fetch_mmcif(
    download_url: &str,
    cache_dir: Option<&Path>,
    reference_id: &str,
) -> Result<String, MutaviewError> {
    let file_name = format!("{}.cif", reference_id.to_lowercase());
    let cached = cache_dir.map(|dir| dir.join(&file_name));

    if let Some(path) = cached.as_ref().filter(|p| p.exists()) {
        log::info!("using cached {}", path.display());
        return Ok(std::fs::read_to_string(path)?);
    }

    let url = format!("{download_url}{file_name}");
    log::info!("Downloading {reference_id} from {url}...");
    let content = ureq::get(&url)
        .call()
        .map_err(|e| {
            MutaviewError::StructureLoad(format!(
                "failed to download {reference_id}: {e}"
            ))
        })?
        .into_body()
        .read_to_string()
        .map_err(|e| {
            MutaviewError::StructureLoad(format!(
                "failed to read {reference_id}: {e}"
            ))
        })?;

    if let Some(path) = cached {
        let _ = fill_cache(&path, &content);
    }
    Ok(content)
}

/// Write a downloaded structure to the cache, warning if that fails.
fn fill_cache(path: &Path, content: &str) -> bool {
    match std::fs::write(path, content) {
        Ok(()) => {
            log::info!("Downloaded to {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("failed to cache {}: {e}", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIF: &str = "\
data_TEST
#
_struct.entry_id 1TUP
_struct.title 'TUMOR SUPPRESSOR P53 COMPLEXED WITH DNA'
#
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_alt_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_entity_id
_atom_site.label_seq_id
_atom_site.pdbx_PDB_ins_code
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.pdbx_formal_charge
_atom_site.auth_seq_id
_atom_site.auth_comp_id
_atom_site.auth_asym_id
_atom_site.auth_atom_id
_atom_site.pdbx_PDB_model_num
ATOM 1 N N . ARG A 1 175 ? 10.000 20.000 30.000 1.00 20.00 ? 175 ARG A N 1
ATOM 2 C CA . ARG A 1 175 ? 11.000 20.000 30.000 1.00 20.00 ? 175 ARG A CA 1
ATOM 3 C CA . HIS A 1 176 ? 12.000 20.000 30.000 1.00 20.00 ? 176 HIS A CA 1
ATOM 4 C \"C1'\" . DC B 2 501 ? 13.000 20.000 30.000 1.00 20.00 ? 501 DC B \"C1'\" 1
#
";

    fn session(dir: Option<PathBuf>) -> HeadlessSession {
        let options = ViewerOptions {
            cache_dir: dir,
            ..ViewerOptions::default()
        };
        let config = SessionConfig {
            background_color: options.background_color.clone(),
        };
        HeadlessSession::create(&config, &options).unwrap()
    }

    #[test]
    fn summarizes_atom_site_loop() {
        let s = StructureSummary::from_mmcif("1TUP", CIF).unwrap();
        assert_eq!(s.atom_count, 4);
        assert_eq!(
            s.chains.iter().map(String::as_str).collect::<Vec<_>>(),
            ["A", "B"]
        );
        assert!(s.has_residue(175));
        assert!(s.has_residue(176));
        assert!(s.has_residue(501));
        assert!(!s.has_residue(10));
    }

    #[test]
    fn quoted_atom_names_keep_columns_aligned() {
        let s = StructureSummary::from_mmcif("1TUP", CIF).unwrap();
        // The quoted DNA atom sits in chain B at residue 501.
        assert!(s.chains.contains("B"));
        assert!(!s.chains.contains("501"));
        assert_eq!(
            s.residues.iter().copied().collect::<Vec<_>>(),
            [175, 176, 501]
        );
    }

    #[test]
    fn unreadable_text_is_a_load_error() {
        assert!(matches!(
            StructureSummary::from_mmcif("1TUP", "<html>Not Found</html>"),
            Err(MutaviewError::StructureLoad(_))
        ));
    }

    #[test]
    fn scene_records_representations_and_camera() {
        let mut session = session(None);
        let summary = StructureSummary::from_mmcif("1TUP", CIF).unwrap();
        let id = session.add_component(summary);
        session.add_representation(id, &Representation::cartoon_by_chain());
        session.add_representation(
            id,
            &Representation::residue_highlight(175, "red", 1.0),
        );
        session.auto_view(
            id,
            &CameraFit::Residue {
                selection: "175".into(),
                duration_ms: 1000,
            },
        );

        let c = &session.components()[0];
        assert_eq!(c.representations.len(), 2);
        let text = session.describe();
        assert!(text.contains("1TUP: 4 atoms, 2 chains"));
        assert!(text.contains("ball+stick [175] color=red radius=1"));
        assert!(text.contains("camera: residue 175 over 1000ms"));

        session.remove_all_components();
        session.remove_all_components();
        assert!(session.components().is_empty());
    }

    #[test]
    fn unsupported_scheme_fails_immediately() {
        let mut session = session(None);
        let pending = session.load_file("file:///tmp/x.cif");
        assert!(matches!(
            pending.try_take(),
            Some(Err(MutaviewError::StructureLoad(_)))
        ));
    }

    #[test]
    fn cached_structure_is_loaded_without_network() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1tup.cif"), CIF).unwrap();
        let mut session = session(Some(dir.path().to_path_buf()));

        let pending = session.load_file("rcsb://1TUP");
        let mut result = None;
        for _ in 0..200 {
            result = pending.try_take();
            if result.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let summary = result.unwrap().unwrap();
        assert_eq!(summary.reference_id, "1TUP");
        assert_eq!(summary.atom_count, 4);
    }

    #[test]
    fn cache_write_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("1tup.cif");
        assert!(fill_cache(&good, CIF));
        assert_eq!(std::fs::read_to_string(&good).unwrap(), CIF);

        let missing = dir.path().join("gone").join("1tup.cif");
        assert!(!fill_cache(&missing, CIF));
        assert!(!missing.exists());
    }
}
