#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error initializing gpio: {0}")]
    GpioInit(rppal::gpio::Error),
    #[error("error claiming pin {0}: {1}")]
    PinClaim(u8, rppal::gpio::Error),
    #[error("error exporting pin {0}: {1}")]
    Export(u8, std::io::Error),
    #[error("error unexporting pin {0}: {1}")]
    Unexport(u8, std::io::Error),
    #[error("error opening control file for pin {0}: {1}")]
    PinOpen(u8, std::io::Error),
    #[error("error setting direction of pin {0}: {1}")]
    PinDirection(u8, std::io::Error),
    #[error("error writing to pin {0}: {1}")]
    PinWrite(u8, std::io::Error),
    #[error("error registering exit handler: {0}")]
    ExitHandler(ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
