use super::error::EngineError;
use super::selection::{AtomRecord, AtomSelector};
use crate::core::io::format::StructureFormat;
use crate::core::io::structure::{read_structure, to_system, write_structure};
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::dihedral_angle;
use nalgebra::Point3;
use pdbtbx::PDB;
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, trace};

/// The structure-modeling capability the workflows are written against.
///
/// An engine holds named objects, each one loaded structure. Workflows only
/// talk to this trait; they never parse files or touch coordinates.
pub trait StructureEngine {
    /// Discards every loaded object.
    fn reinitialize(&mut self);

    /// Loads a structure file, picking the format from its extension.
    ///
    /// The object is registered under `name`, or the file stem when `None`,
    /// replacing any object of the same name. Returns the object name.
    fn load(&mut self, path: &Path, name: Option<&str>) -> Result<String, EngineError>;

    /// Writes the object `name` to `path`, picking the format from the extension.
    fn save(&self, path: &Path, name: &str) -> Result<(), EngineError>;

    fn delete(&mut self, name: &str) -> Result<(), EngineError>;

    fn count_atoms(&self, selector: &AtomSelector) -> usize;

    /// Dihedral angle in degrees between four single-atom selections, in the
    /// order given.
    ///
    /// # Errors
    ///
    /// Each selector must match exactly one atom; otherwise returns
    /// [`EngineError::EmptySelection`] or [`EngineError::AmbiguousSelection`].
    /// Collinear atoms give [`EngineError::Geometry`].
    fn get_dihedral(
        &self,
        s1: &AtomSelector,
        s2: &AtomSelector,
        s3: &AtomSelector,
        s4: &AtomSelector,
    ) -> Result<f64, EngineError>;

    /// Calls `visit` for every matching atom in file order.
    fn iterate(&self, selector: &AtomSelector, visit: &mut dyn FnMut(&AtomRecord));
}

/// Keeps exactly one structure loaded for the lifetime of the guard.
///
/// The engine is reset before loading and again when the guard is dropped,
/// whichever way the enclosing operation ends.
pub struct LoadGuard<'a, E: StructureEngine + ?Sized> {
    engine: &'a mut E,
    name: String,
}

impl<'a, E: StructureEngine + ?Sized> LoadGuard<'a, E> {
    pub fn load(engine: &'a mut E, path: &Path) -> Result<Self, EngineError> {
        engine.reinitialize();
        let name = engine.load(path, None)?;
        Ok(Self { engine, name })
    }

    /// Name of the loaded object.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: StructureEngine + ?Sized> Deref for LoadGuard<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.engine
    }
}

impl<E: StructureEngine + ?Sized> Drop for LoadGuard<'_, E> {
    fn drop(&mut self) {
        self.engine.reinitialize();
    }
}

#[derive(Debug, Clone)]
struct LoadedObject {
    name: String,
    structure: PDB,
    system: MolecularSystem,
}

/// In-process [`StructureEngine`]: files are parsed and written by `pdbtbx`,
/// selections and geometry run on the mapped [`MolecularSystem`].
#[derive(Debug, Default)]
pub struct Session {
    objects: Vec<LoadedObject>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the session and loads `path`, returning a guard that resets it again on drop.
    pub fn scoped_load(&mut self, path: &Path) -> Result<LoadGuard<'_, Self>, EngineError> {
        LoadGuard::load(self, path)
    }

    /// Names of the loaded objects in load order.
    pub fn object_names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.name.as_str()).collect()
    }

    pub fn system(&self, name: &str) -> Option<&MolecularSystem> {
        self.find(name).map(|o| &o.system)
    }

    fn find(&self, name: &str) -> Option<&LoadedObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn visit_atoms(&self, selector: &AtomSelector, visit: &mut dyn FnMut(&AtomRecord)) {
        for object in self.objects.iter().filter(|o| selector.matches_object(&o.name)) {
            let system = &object.system;
            for (_, chain) in system
                .chains_iter()
                .filter(|(_, chain)| selector.matches_chain(&chain.id))
            {
                for residue in chain.residues().iter().filter_map(|&id| system.residue(id)) {
                    let index = residue.index_label();
                    if !selector.matches_residue(&index) {
                        continue;
                    }
                    for atom in residue.atoms().iter().filter_map(|&id| system.atom(id)) {
                        if !selector.matches_name(&atom.name) {
                            continue;
                        }
                        visit(&AtomRecord {
                            object: object.name.clone(),
                            chain: chain.id.clone(),
                            residue_index: index.clone(),
                            residue_name: residue.name.clone(),
                            atom_name: atom.name.clone(),
                            alt_loc: atom.alt_loc,
                            position: atom.position,
                        });
                    }
                }
            }
        }
    }

    fn single_position(&self, selector: &AtomSelector) -> Result<Point3<f64>, EngineError> {
        let mut positions = Vec::new();
        self.visit_atoms(selector, &mut |record| positions.push(record.position));
        match positions.as_slice() {
            [] => Err(EngineError::EmptySelection(selector.to_string())),
            [position] => Ok(*position),
            many => Err(EngineError::AmbiguousSelection {
                selector: selector.to_string(),
                count: many.len(),
            }),
        }
    }
}

fn detect_format(path: &Path) -> Result<StructureFormat, EngineError> {
    StructureFormat::from_path(path).ok_or_else(|| EngineError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

impl StructureEngine for Session {
    fn reinitialize(&mut self) {
        trace!(objects = self.objects.len(), "Reinitializing session");
        self.objects.clear();
    }

    fn load(&mut self, path: &Path, name: Option<&str>) -> Result<String, EngineError> {
        let format = detect_format(path)?;
        let name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };

        let structure =
            read_structure(path, format).map_err(|source| EngineError::ReadStructure {
                path: path.to_path_buf(),
                format,
                source,
            })?;
        let system = to_system(&structure);
        debug!(
            object = %name,
            atoms = system.atom_count(),
            format = %format,
            "Loaded structure from {}",
            path.display()
        );

        self.objects.retain(|o| o.name != name);
        self.objects.push(LoadedObject {
            name: name.clone(),
            structure,
            system,
        });
        Ok(name)
    }

    fn save(&self, path: &Path, name: &str) -> Result<(), EngineError> {
        let format = detect_format(path)?;
        let object = self
            .find(name)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))?;

        write_structure(&object.structure, path, format).map_err(|source| {
            EngineError::WriteStructure {
                path: path.to_path_buf(),
                format,
                source,
            }
        })?;
        debug!(object = %name, format = %format, "Saved structure to {}", path.display());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), EngineError> {
        let before = self.objects.len();
        self.objects.retain(|o| o.name != name);
        if self.objects.len() == before {
            return Err(EngineError::ObjectNotFound(name.to_string()));
        }
        Ok(())
    }

    fn count_atoms(&self, selector: &AtomSelector) -> usize {
        let mut count = 0;
        self.visit_atoms(selector, &mut |_| count += 1);
        count
    }

    fn get_dihedral(
        &self,
        s1: &AtomSelector,
        s2: &AtomSelector,
        s3: &AtomSelector,
        s4: &AtomSelector,
    ) -> Result<f64, EngineError> {
        let p1 = self.single_position(s1)?;
        let p2 = self.single_position(s2)?;
        let p3 = self.single_position(s3)?;
        let p4 = self.single_position(s4)?;
        dihedral_angle(&p1, &p2, &p3, &p4).ok_or_else(|| {
            EngineError::Geometry(format!(
                "dihedral ({}) / ({}) / ({}) / ({}) is undefined for collinear atoms",
                s1, s2, s3, s4
            ))
        })
    }

    fn iterate(&self, selector: &AtomSelector, visit: &mut dyn FnMut(&AtomRecord)) {
        self.visit_atoms(selector, visit);
    }
}
