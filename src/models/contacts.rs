//! Coarse-grained protein contact model.
//!
//! Each native contact is a Gaussian well over the distance of one residue
//! pair; frames are rows of pair distances with one column per contact.
//! Contact strengths are the parameters and the fitted subset are the
//! epsilons.
use ndarray::{Array1, Array2, ArrayView2};

use crate::models::{
    basis::PotentialTerm,
    errors::ModelResult,
    linear::{validate_frames, EpsilonLayout, LinearPotential},
    traits::{EpsilonPotential, PotentialModel},
};

/// One native contact between residues `pair.0` and `pair.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub pair: (usize, usize),
    /// Native distance.
    pub r0: f64,
    /// Well width.
    pub width: f64,
}

impl Contact {
    fn term(&self) -> PotentialTerm {
        PotentialTerm::GaussianWell { center: self.r0, width: self.width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactModel {
    contacts: Vec<Contact>,
    layout: EpsilonLayout,
}

impl ContactModel {
    /// # Errors
    /// - `InvalidTerm` for a contact with a non-finite distance or a
    ///   non-positive width.
    /// - Layout errors as for [`crate::models::LangevinModel::new`].
    pub fn new(
        contacts: Vec<Contact>, strengths: Array1<f64>, fit_mask: &[bool], beta: f64,
    ) -> ModelResult<Self> {
        for (index, contact) in contacts.iter().enumerate() {
            contact.term().validate(index)?;
        }
        let layout = EpsilonLayout::new(contacts.len(), strengths, fit_mask, beta)?;
        Ok(Self { contacts, layout })
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn strengths(&self) -> &Array1<f64> {
        &self.layout.params
    }
}

impl PotentialModel for ContactModel {
    fn epsilons(&self) -> &Array1<f64> {
        &self.layout.epsilons
    }

    fn use_params(&self) -> &[usize] {
        &self.layout.use_params
    }

    fn potentials_epsilon(&self, data: ArrayView2<f64>) -> ModelResult<Box<dyn EpsilonPotential>> {
        validate_frames(data, self.contacts.len())?;
        let mut shapes = Array2::<f64>::zeros((self.contacts.len(), data.nrows()));
        for (i, contact) in self.contacts.iter().enumerate() {
            shapes.row_mut(i).assign(&contact.term().eval_many(data.column(i)));
        }
        let potential = LinearPotential::from_shapes(
            shapes.view(),
            &self.layout.params,
            &self.layout.use_params,
            self.layout.beta,
        )?;
        Ok(Box::new(potential))
    }
}
