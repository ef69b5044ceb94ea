use crate::config::Config;
use crate::device::{Device, FieldDetail, FieldId, Peripheral, Register};
use crate::error::ParseError;
use crate::layout::{layout_with, DrawPlan, LayoutConfig};
use log::info;

/// The currently loaded device and the register selected in it.
///
/// A session owns at most one device model at a time. Loading a new document
/// replaces the model as a whole, and only once the new document has been
/// built successfully; a failed load leaves the previous model and selection
/// in place.
#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    layout: LayoutConfig,
    device: Option<Device>,
    selected: Option<(usize, usize)>,
}

impl Session {
    /// Creates an empty session with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with the given parse and layout options.
    pub fn with_config(config: Config, layout: LayoutConfig) -> Self {
        Self { config, layout, device: None, selected: None }
    }

    /// Builds a device model from `document` and makes it current.
    pub fn load(&mut self, document: &[u8]) -> Result<&Device, ParseError> {
        let device = self.config.parse(document)?;
        info!(
            device = device.name.as_str(),
            peripherals = device.peripherals().len(),
            registers = device.register_count();
            "device loaded"
        );
        self.selected = None;
        Ok(&*self.device.insert(device))
    }

    /// Returns the current device model.
    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    /// Selects the first register named `name`.
    pub fn select(&mut self, name: &str) -> Option<&Register> {
        self.select_where(|_, register| register.name == name)
    }

    /// Selects the register named `name` inside the peripheral `peripheral`.
    pub fn select_in(&mut self, peripheral: &str, name: &str) -> Option<&Register> {
        self.select_where(|periph, register| periph.name == peripheral && register.name == name)
    }

    /// Clears the selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Returns the selected register with its peripheral.
    pub fn selected(&self) -> Option<(&Peripheral, &Register)> {
        let (periph, reg) = self.selected?;
        let peripheral = self.device.as_ref()?.peripherals().get(periph)?;
        Some((peripheral, peripheral.registers().get(reg)?))
    }

    /// Lays out the selected register over `width` pixels. Returns `None`
    /// when nothing is selected or the register has nothing to draw.
    pub fn diagram(&self, width: f32) -> Option<DrawPlan> {
        let (_, register) = self.selected()?;
        layout_with(register, width, &self.layout)
    }

    /// Returns the detail view of field `id` of the selected register.
    pub fn field_detail(&self, id: FieldId) -> Option<FieldDetail> {
        let (_, register) = self.selected()?;
        register.field(id).map(|field| field.detail())
    }

    fn select_where(&mut self, f: impl Fn(&Peripheral, &Register) -> bool) -> Option<&Register> {
        let device = self.device.as_ref()?;
        self.selected = device.peripherals().iter().enumerate().find_map(|(i, peripheral)| {
            peripheral
                .registers()
                .iter()
                .position(|register| f(peripheral, register))
                .map(|j| (i, j))
        });
        self.selected().map(|(_, register)| register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r"
        <device>
          <name>DEV</name>
          <peripherals>
            <peripheral>
              <name>TIM1</name>
              <baseAddress>0x40010000</baseAddress>
              <registers>
                <register>
                  <name>CR1</name>
                  <addressOffset>0x0</addressOffset>
                  <fields>
                    <field><name>CEN</name><bitOffset>0</bitOffset></field>
                  </fields>
                </register>
                <register>
                  <name>SR</name>
                  <addressOffset>0x10</addressOffset>
                </register>
              </registers>
            </peripheral>
          </peripherals>
        </device>";

    #[test]
    fn select_and_draw() {
        let mut session = Session::new();
        session.load(DOCUMENT.as_bytes()).unwrap();
        assert!(session.diagram(340.0).is_none());

        session.select("CR1").unwrap();
        let plan = session.diagram(340.0).unwrap();
        let (id, _) = plan.field_boxes().next().unwrap();
        assert_eq!(session.field_detail(id).unwrap().name, "CEN");

        session.select_in("TIM1", "SR").unwrap();
        assert!(session.diagram(340.0).is_none());
        assert!(session.select("MISSING").is_none());
        assert!(session.selected().is_none());
    }

    #[test]
    fn failed_load_keeps_model() {
        let mut session = Session::new();
        session.load(DOCUMENT.as_bytes()).unwrap();
        session.select("CR1").unwrap();
        let before = session.device().cloned();

        assert!(session.load(b"<device><name>BROKEN</name><peripherals>").is_err());
        assert_eq!(session.device().cloned(), before);
        assert_eq!(session.selected().unwrap().1.name, "CR1");
    }
}
